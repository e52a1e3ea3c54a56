// Test utilities available to both unit and integration tests
// Only compiled when testing

use rust_xlsxwriter::Workbook;

use crate::classifier::{CanonicalRecord, RecordTable};
use crate::raw_grid::{CellValue, RawGrid, Table};

/// Header row of a typical learning-platform export
pub const PLATFORM_HEADER: [&str; 6] = [
    "Usuario - Nombre completo del usuario",
    "Usuario - Dirección",
    "Usuario - Departamento",
    "Usuario - Puesto",
    "Capacitación - Título de la capacitación",
    "Registro de capacitación - Estado del expediente",
];

/// Row of text cells; `""` becomes an empty cell
pub fn cells(values: &[&str]) -> Vec<CellValue> {
    values
        .iter()
        .map(|value| {
            if value.is_empty() {
                CellValue::Empty
            } else {
                CellValue::from(*value)
            }
        })
        .collect()
}

pub fn grid_from(rows: &[&[&str]]) -> RawGrid {
    RawGrid::from_rows(rows.iter().map(|row| cells(row)).collect())
}

pub fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Records from (collaborator, direction, branch, course, status) tuples
pub fn records_from(rows: &[(&str, &str, &str, &str, &str)]) -> RecordTable {
    RecordTable::new(
        rows.iter()
            .map(|(collaborator, direction, branch, course, status)| {
                CanonicalRecord::new(*collaborator, *direction, *branch, *course, *status)
            })
            .collect(),
    )
}

/// Rows of a small export: two directions, mixed spelling of the same direction
pub fn sample_rows() -> Vec<[&'static str; 6]> {
    vec![
        ["Ana López", "FINANZAS", "Tesorería", "Analista", "Medidas de seguridad en el puesto de trabajo", "Terminado"],
        ["Luis Pérez", "FINANZAS", "Tesorería", "Analista", "PCI DSS VERSIÓN 4.0", "En proceso"],
        ["Eva Ruiz", "finanzas", "Contabilidad", "Gerente", "Política: Conflicto de Intereses 2024", "EXENCIÓN"],
        ["Raúl Díaz", "Finanzas", "Contabilidad", "Auxiliar", "PCI DSS VERSIÓN 4.0", "No iniciado"],
        ["Sara Gómez", "Operaciones", "Operaciones Emisión", "Analista", "PCI DSS VERSIÓN 4.0", "Concluido"],
        ["Iván Mora", "Operaciones", "Centro de Contacto", "Ejecutivo", "Protección de Datos Personales 2024", ""],
    ]
}

/// [`sample_rows`] under [`PLATFORM_HEADER`]
pub fn sample_table() -> Table {
    Table::new(
        labels(&PLATFORM_HEADER),
        sample_rows().iter().map(|row| cells(row)).collect(),
    )
}

pub fn sample_records() -> RecordTable {
    RecordTable::new(
        sample_rows()
            .iter()
            .map(|row| CanonicalRecord::new(row[0], row[1], row[2], row[4], row[5]))
            .collect(),
    )
}

/// In-memory xlsx with one sheet per `(name, rows)`; `""` cells are left blank
pub fn workbook_bytes(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet
                        .write_string(row_idx as u32, col_idx as u16, *value)
                        .unwrap();
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// A platform export with `title_rows` title lines above the header
pub fn platform_export_rows(title_rows: usize) -> Vec<Vec<&'static str>> {
    let mut rows: Vec<Vec<&'static str>> = Vec::new();
    for i in 0..title_rows {
        rows.push(if i == 0 {
            vec!["Reporte de avance de capacitación"]
        } else {
            vec![""]
        });
    }
    rows.push(PLATFORM_HEADER.to_vec());
    for row in sample_rows() {
        rows.push(row.to_vec());
    }
    rows
}
