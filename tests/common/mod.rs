//! Common test utilities for the compliance-report tests

use compliance_lib::{GroupBy, SummaryRow, aggregate};
use std::io::Write;
use tempfile::NamedTempFile;

#[allow(unused_imports)]
pub use compliance_lib::test_utils::{platform_export_rows, records_from, sample_records};

/// Pending-only summary of the sample records
#[allow(dead_code)]
pub fn sample_pending_summary(group_by: GroupBy) -> Vec<SummaryRow> {
    aggregate(&sample_records().pending(), group_by)
}

/// Platform export with `title_rows` title lines, written to a temporary `.xlsx`
#[allow(dead_code)]
pub fn platform_export_file(title_rows: usize) -> NamedTempFile {
    let bytes =
        compliance_lib::test_utils::workbook_bytes(&[("Reporte", platform_export_rows(title_rows))]);
    let mut file = tempfile::Builder::new()
        .suffix(".xlsx")
        .tempfile()
        .expect("create temp workbook");
    file.write_all(&bytes).expect("write temp workbook");
    file.flush().expect("flush temp workbook");
    file
}
