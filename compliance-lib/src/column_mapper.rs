use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{ComplianceError, Result};
use crate::synonyms::{CanonicalField, REQUIRED_FIELDS, SynonymCatalog};
use crate::utils::normalize_text;

/// Canonical field → label of the column holding it in the loaded table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    columns: HashMap<CanonicalField, String>,
}

/// Operator's answer for a field the automatic mapping could not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnResolution {
    /// Use the column with this exact label
    Column(String),
    /// The file has no such column
    DoesNotExist,
}

impl ColumnMap {
    pub fn new() -> Self {
        ColumnMap::default()
    }

    pub fn insert(&mut self, field: CanonicalField, label: impl Into<String>) {
        self.columns.insert(field, label.into());
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.columns.get(&field).map(|label| label.as_str())
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolved fields in canonical order
    pub fn entries(&self) -> Vec<(CanonicalField, &str)> {
        let mut entries: Vec<(CanonicalField, &str)> = self
            .columns
            .iter()
            .map(|(field, label)| (*field, label.as_str()))
            .collect();
        entries.sort_by_key(|(field, _)| *field);
        entries
    }

    /// Required fields without a column, in reporting order
    pub fn missing(&self) -> Vec<CanonicalField> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !self.contains(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Complete the map with the operator's answers
    ///
    /// Answers override automatic matches. A field answered with
    /// [`ColumnResolution::DoesNotExist`] ends the ingestion: the report cannot be
    /// built without it and no placeholder column is substituted.
    pub fn resolve_manually(
        mut self,
        resolutions: &[(CanonicalField, ColumnResolution)],
        labels: &[String],
    ) -> Result<ColumnMap> {
        let mut unavailable = Vec::new();
        for (field, resolution) in resolutions {
            match resolution {
                ColumnResolution::Column(label) => {
                    if !labels.contains(label) {
                        return Err(ComplianceError::UnknownColumn(label.clone()));
                    }
                    self.insert(*field, label.clone());
                }
                ColumnResolution::DoesNotExist => {
                    self.columns.remove(field);
                    if field.is_required() {
                        unavailable.push(*field);
                    }
                }
            }
        }

        if !unavailable.is_empty() {
            return Err(ComplianceError::ColumnsUnavailable(unavailable));
        }

        let missing = self.missing();
        if !missing.is_empty() {
            return Err(ComplianceError::MissingColumns(missing));
        }

        Ok(self)
    }
}

/// Match each canonical field to a column label
///
/// Synonyms are tried in catalog order and the first one present in `labels`
/// (compared after normalization) wins, even when a later synonym is also present.
/// Fields with no matching label are left out of the map.
pub fn build_column_map(labels: &[String], catalog: &SynonymCatalog) -> ColumnMap {
    let mut label_by_norm: HashMap<String, &String> = HashMap::new();
    for label in labels {
        // Repeated labels (forward-filled merged headers) resolve to their first column
        label_by_norm.entry(normalize_text(label)).or_insert(label);
    }

    let mut column_map = ColumnMap::new();
    for (field, synonyms) in catalog.entries() {
        let found = synonyms
            .iter()
            .find_map(|synonym| label_by_norm.get(&normalize_text(synonym)));
        if let Some(label) = found {
            column_map.insert(*field, (*label).clone());
        }
    }

    let missing = column_map.missing();
    if missing.is_empty() {
        debug!(columns = ?column_map.entries(), "all required columns mapped");
    } else {
        warn!(missing = ?missing, "required columns not recognized automatically");
    }

    column_map
}
