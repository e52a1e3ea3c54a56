use std::io::Write;
use tempfile::NamedTempFile;

// Re-export shared test utilities from src/test_utils.rs
// These are the core functions used by most tests
#[allow(unused_imports)]
pub use compliance_lib::test_utils::{
    PLATFORM_HEADER, cells, grid_from, labels, platform_export_rows, records_from,
    sample_records, sample_rows, sample_table, workbook_bytes,
};

/// Write workbook bytes to a temporary `.xlsx` file (calamine picks the reader by extension)
#[allow(dead_code)]
pub fn write_temp_workbook(bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".xlsx")
        .tempfile()
        .expect("create temp workbook");
    file.write_all(bytes).expect("write temp workbook");
    file.flush().expect("flush temp workbook");
    file
}

/// Single-sheet workbook named "Reporte"
#[allow(dead_code)]
pub fn single_sheet_workbook(rows: Vec<Vec<&str>>) -> Vec<u8> {
    workbook_bytes(&[("Reporte", rows)])
}
