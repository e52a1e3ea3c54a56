use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::classifier::{CanonicalRecord, RecordTable};
use crate::utils::normalize_text;

/// Records of one direction, compared case- and accent-insensitively
pub fn filter_direction(records: &RecordTable, direction: &str) -> RecordTable {
    let target = normalize_text(direction);
    let filtered = records.filter(|record| record.direction_norm == target);
    debug!(direction = %target, records = filtered.len(), "direction filter applied");
    filtered
}

/// Course restriction applied after the direction filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CourseFilter {
    #[default]
    All,
    /// Exact course names, compared after normalization
    Exact(Vec<String>),
    /// Case-insensitive substrings of the course name; any keyword may match
    Keywords(Vec<String>),
}

impl CourseFilter {
    /// Keyword filter from comma separated text; blank keywords are dropped
    pub fn keywords_from_csv(text: &str) -> CourseFilter {
        let keywords: Vec<String> = text
            .split(',')
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty())
            .map(|keyword| keyword.to_string())
            .collect();
        CourseFilter::Keywords(keywords)
    }

    /// Whether this filter keeps every record
    pub fn is_all(&self) -> bool {
        match self {
            CourseFilter::All => true,
            CourseFilter::Exact(courses) => courses.is_empty(),
            CourseFilter::Keywords(keywords) => keywords.is_empty(),
        }
    }

    pub fn apply(&self, records: &RecordTable) -> RecordTable {
        if self.is_all() {
            return records.clone();
        }

        let filtered = match self {
            CourseFilter::All => records.clone(),
            CourseFilter::Exact(courses) => {
                let wanted: HashSet<String> =
                    courses.iter().map(|course| normalize_text(course)).collect();
                records.filter(|record| wanted.contains(&record.course_norm))
            }
            CourseFilter::Keywords(keywords) => {
                let needles: Vec<String> = keywords
                    .iter()
                    .map(|keyword| keyword.to_lowercase())
                    .collect();
                records.filter(|record| course_contains_any(record, &needles))
            }
        };
        debug!(filter = ?self, records = filtered.len(), "course filter applied");
        filtered
    }
}

fn course_contains_any(record: &CanonicalRecord, lowercase_needles: &[String]) -> bool {
    let course = record.course.to_lowercase();
    lowercase_needles
        .iter()
        .any(|needle| course.contains(needle.as_str()))
}

fn distinct_values<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|value| !value.trim().is_empty())
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Sorted, distinct raw direction values (for a direction selector)
pub fn distinct_directions(records: &RecordTable) -> Vec<String> {
    distinct_values(records.iter().map(|record| &record.direction))
}

/// Sorted, distinct raw course names (for an exact course selector)
pub fn distinct_courses(records: &RecordTable) -> Vec<String> {
    distinct_values(records.iter().map(|record| &record.course))
}
