use serde::Serialize;
use std::collections::HashMap;

use crate::classifier::{CanonicalRecord, RecordTable};

/// Grouping keys for a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupBy {
    Direction,
    DirectionBranch,
    Course,
}

impl GroupBy {
    /// Column headers of the grouping keys
    pub fn key_labels(&self) -> &'static [&'static str] {
        match self {
            GroupBy::Direction => &["Dirección"],
            GroupBy::DirectionBranch => &["Dirección", "Sucursal"],
            GroupBy::Course => &["Curso"],
        }
    }

    /// Raw display values of the grouping keys
    fn keys_of(&self, record: &CanonicalRecord) -> Vec<String> {
        match self {
            GroupBy::Direction => vec![record.direction.clone()],
            GroupBy::DirectionBranch => vec![record.direction.clone(), record.branch.clone()],
            GroupBy::Course => vec![record.course.clone()],
        }
    }
}

/// Counts for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub keys: Vec<String>,
    pub total: usize,
    pub compliant: usize,
    pub pending: usize,
}

impl SummaryRow {
    /// The most specific key (branch for direction+branch groups)
    pub fn label(&self) -> &str {
        self.keys.last().map(|key| key.as_str()).unwrap_or_default()
    }

    fn add(&mut self, record: &CanonicalRecord) {
        self.total += 1;
        if record.compliant {
            self.compliant += 1;
        } else {
            self.pending += 1;
        }
    }
}

/// Overall counts of a record table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total: usize,
    pub compliant: usize,
    pub pending: usize,
}

impl Totals {
    pub fn of(records: &RecordTable) -> Self {
        let compliant = records.iter().filter(|record| record.compliant).count();
        Totals {
            total: records.len(),
            compliant,
            pending: records.len() - compliant,
        }
    }
}

/// Group and count records
///
/// Groups compare on raw display values. Rows come back with the most pending
/// first, then the largest total; remaining ties keep first-seen order.
pub fn aggregate(records: &RecordTable, group_by: GroupBy) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = Vec::new();
    let mut position: HashMap<Vec<String>, usize> = HashMap::new();

    for record in records {
        let keys = group_by.keys_of(record);
        let index = *position.entry(keys.clone()).or_insert_with(|| {
            rows.push(SummaryRow {
                keys,
                total: 0,
                compliant: 0,
                pending: 0,
            });
            rows.len() - 1
        });
        rows[index].add(record);
    }

    // sort_by is stable
    rows.sort_by(|a, b| b.pending.cmp(&a.pending).then(b.total.cmp(&a.total)));
    rows
}
