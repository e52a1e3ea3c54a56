use serde::Serialize;
use tracing::debug;

use crate::aggregator::Totals;
use crate::column_mapper::ColumnMap;
use crate::error::{ComplianceError, Result};
use crate::raw_grid::Table;
use crate::synonyms::CanonicalField;
use crate::utils::normalize_text;

/// Normalized record statuses that count as compliant
///
/// Anything else, including blanks and misspellings, is pending.
pub const COMPLIANT_STATUSES: [&str; 3] = ["TERMINADO", "CONCLUIDO", "EXENCION"];

pub fn is_compliant_status(normalized_status: &str) -> bool {
    COMPLIANT_STATUSES.contains(&normalized_status)
}

/// One training-course record of one collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub collaborator: String,
    pub direction: String,
    pub branch: String,
    pub course: String,
    pub status: String,
    pub direction_norm: String,
    pub branch_norm: String,
    pub course_norm: String,
    pub status_norm: String,
    pub compliant: bool,
}

impl CanonicalRecord {
    /// Build a record from raw display values, deriving the normalized fields
    pub fn new(
        collaborator: impl Into<String>,
        direction: impl Into<String>,
        branch: impl Into<String>,
        course: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        let direction = direction.into();
        let branch = branch.into();
        let course = course.into();
        let status = status.into();
        let status_norm = normalize_text(&status);
        let compliant = is_compliant_status(&status_norm);

        CanonicalRecord {
            collaborator: collaborator.into(),
            direction_norm: normalize_text(&direction),
            branch_norm: normalize_text(&branch),
            course_norm: normalize_text(&course),
            status_norm,
            direction,
            branch,
            course,
            status,
            compliant,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.compliant
    }
}

/// Classified records; filtering always yields a new table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    records: Vec<CanonicalRecord>,
}

impl RecordTable {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        RecordTable { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records matching `predicate`, as a new table
    pub fn filter<F>(&self, mut predicate: F) -> RecordTable
    where
        F: FnMut(&CanonicalRecord) -> bool,
    {
        RecordTable::new(self.records.iter().filter(|r| predicate(r)).cloned().collect())
    }

    pub fn pending(&self) -> RecordTable {
        self.filter(CanonicalRecord::is_pending)
    }

    pub fn compliant(&self) -> RecordTable {
        self.filter(|record| record.compliant)
    }

    pub fn totals(&self) -> Totals {
        Totals::of(self)
    }
}

impl<'a> IntoIterator for &'a RecordTable {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Project the five required fields out of `table` and classify every row
///
/// The column map must already be complete; missing fields are reported, not
/// defaulted.
pub fn classify(table: &Table, column_map: &ColumnMap) -> Result<RecordTable> {
    let missing = column_map.missing();
    if !missing.is_empty() {
        return Err(ComplianceError::MissingColumns(missing));
    }

    let column = |field: CanonicalField| -> Result<usize> {
        // Presence was checked above
        let label = column_map.get(field).unwrap_or_default();
        table
            .column_index(label)
            .ok_or_else(|| ComplianceError::UnknownColumn(label.to_string()))
    };
    let collaborator_idx = column(CanonicalField::CollaboratorName)?;
    let direction_idx = column(CanonicalField::Direction)?;
    let branch_idx = column(CanonicalField::Branch)?;
    let course_idx = column(CanonicalField::Course)?;
    let status_idx = column(CanonicalField::RecordStatus)?;

    let records: Vec<CanonicalRecord> = (0..table.height())
        .map(|row| {
            CanonicalRecord::new(
                table.cell(row, collaborator_idx).to_string(),
                table.cell(row, direction_idx).to_string(),
                table.cell(row, branch_idx).to_string(),
                table.cell(row, course_idx).to_string(),
                table.cell(row, status_idx).to_string(),
            )
        })
        .collect();

    let records = RecordTable::new(records);
    debug!(
        records = records.len(),
        pending = records.pending().len(),
        "records classified"
    );
    Ok(records)
}
