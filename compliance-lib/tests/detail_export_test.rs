mod common;

use common::*;
use compliance_lib::report::{detail_rows, pending_detail, suggested_file_name};
use compliance_lib::{RecordTable, export_detail_csv, filter_direction};
use std::fs;

#[test]
fn test_pending_detail_csv_for_direction() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("pendientes.csv");

    let finanzas = filter_direction(&sample_records(), "Finanzas");
    export_detail_csv(&pending_detail(&finanzas), &csv_path).unwrap();

    let content = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Sucursal,Nombre_Colaborador,Curso,Estado_Expediente,Es_Pendiente",
            "Contabilidad,Raúl Díaz,PCI DSS VERSIÓN 4.0,No iniciado,true",
            "Tesorería,Luis Pérez,PCI DSS VERSIÓN 4.0,En proceso,true",
        ]
    );
}

#[test]
fn test_full_detail_marks_compliant_rows() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("detalle.csv");

    let rows = detail_rows(&sample_records());
    assert_eq!(rows.len(), 6);
    export_detail_csv(&rows, &csv_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let flags: Vec<String> = reader
        .records()
        .map(|record| record.unwrap()[4].to_string())
        .collect();
    assert_eq!(flags.iter().filter(|flag| *flag == "true").count(), 3);
    assert_eq!(flags.iter().filter(|flag| *flag == "false").count(), 3);
}

#[test]
fn test_fields_with_commas_are_quoted() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("comas.csv");
    let records = records_from(&[(
        "López, Ana",
        "Finanzas",
        "Centro",
        "Política: Conflicto de Intereses",
        "En proceso",
    )]);

    export_detail_csv(&detail_rows(&records), &csv_path).unwrap();
    let content = fs::read_to_string(&csv_path).unwrap();
    assert!(content.contains("Centro,\"López, Ana\",Política: Conflicto de Intereses,En proceso,true"));
}

#[test]
fn test_empty_detail_still_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("vacio.csv");

    export_detail_csv(&pending_detail(&RecordTable::default()), &csv_path).unwrap();
    let content = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        content.trim_end(),
        "Sucursal,Nombre_Colaborador,Curso,Estado_Expediente,Es_Pendiente"
    );
}

#[test]
fn test_suggested_file_name_uses_normalized_direction() {
    assert_eq!(
        suggested_file_name("Dirección de Operaciones"),
        "Reporte_Visual_DIRECCION_DE_OPERACIONES.xlsx"
    );
}
