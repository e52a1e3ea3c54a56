use thiserror::Error;

use crate::synonyms::CanonicalField;

pub type Result<T, E = ComplianceError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Unable to read workbook: {0}")]
    Workbook(String),

    #[error("Sheet '{sheet}' not found in workbook. Available sheets: {available:?}")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Sheet '{0}' contains no rows")]
    EmptySheet(String),

    #[error("Required columns could not be resolved: {}", field_list(.0))]
    MissingColumns(Vec<CanonicalField>),

    #[error("Required columns marked as not present in the file: {}", field_list(.0))]
    ColumnsUnavailable(Vec<CanonicalField>),

    #[error("Column '{0}' does not exist in the loaded table")]
    UnknownColumn(String),

    #[error("Failed to export report: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl From<calamine::Error> for ComplianceError {
    fn from(err: calamine::Error) -> Self {
        ComplianceError::Workbook(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ComplianceError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ComplianceError::Export(err.to_string())
    }
}

fn field_list(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
