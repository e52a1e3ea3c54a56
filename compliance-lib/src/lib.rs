#![allow(clippy::needless_return)]

pub mod aggregator;
pub mod classifier;
pub mod column_mapper;
mod error;
pub mod filters;
pub mod header_locator;
pub mod raw_grid;
pub mod report;
pub mod synonyms;
pub mod utils;
pub mod workbook;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use aggregator::{GroupBy, SummaryRow, Totals, aggregate};
pub use classifier::{COMPLIANT_STATUSES, CanonicalRecord, RecordTable, classify};
pub use column_mapper::{ColumnMap, ColumnResolution, build_column_map};
pub use error::{ComplianceError, Result};
pub use filters::{CourseFilter, distinct_courses, distinct_directions, filter_direction};
pub use header_locator::{HeaderDetection, locate_header};
pub use raw_grid::{CellValue, RawGrid, Table};
pub use report::{DashboardReport, export_detail_csv};
pub use synonyms::{CanonicalField, REQUIRED_FIELDS, SynonymCatalog};
pub use workbook::{LoadedSheet, WorkbookCache, WorkbookLoader};

pub const ERRORS_LOG_FILE: &str = "errors.log";
