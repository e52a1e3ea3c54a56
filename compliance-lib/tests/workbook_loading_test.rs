mod common;

use common::*;
use compliance_lib::workbook::DEFAULT_SKIP_ROWS;
use compliance_lib::{
    CanonicalField, ComplianceError, HeaderDetection, SynonymCatalog, WorkbookCache,
    WorkbookLoader, classify,
};

/// Fixed-layout export: title block, positional header, then data
fn legacy_export_rows() -> Vec<Vec<&'static str>> {
    let mut rows: Vec<Vec<&'static str>> = vec![vec!["Reporte de Cursos Cumplimiento"]];
    for _ in 1..DEFAULT_SKIP_ROWS {
        rows.push(vec![""]);
    }
    rows.push(vec![
        "Colaborador", "Puesto", "Estatus", "Dirección", "Sucursal", "Unidad", "Estado",
        "Jefe", "Curso", "Expediente", "Correo", "Jefe Nombre", "", "", "Inicio", "Fin",
    ]);
    rows.push(vec![
        "Ana López", "Analista", "Activo", "FINANZAS", "Tesorería", "Banca", "CDMX",
        "Luis", "PCI DSS VERSIÓN 4.0", "Terminado", "ana@example.com", "Luis Pérez",
        "", "", "01/01/2025", "31/01/2025",
    ]);
    rows.push(vec![
        "Eva Ruiz", "Gerente", "Activo", "FINANZAS", "Contabilidad", "Banca", "CDMX",
        "Luis", "PCI DSS VERSIÓN 4.0", "En proceso", "eva@example.com", "Luis Pérez",
        "", "", "01/01/2025", "",
    ]);
    rows
}

#[test]
fn test_load_auto_header_from_bytes() {
    let bytes = single_sheet_workbook(platform_export_rows(3));
    let mut loader = WorkbookLoader::from_bytes(bytes).unwrap();
    let loaded = loader
        .load_auto_header(None, &SynonymCatalog::default(), &HeaderDetection::default())
        .unwrap();

    assert_eq!(loaded.sheet_name, "Reporte");
    assert_eq!(loaded.sheet_names, vec!["Reporte".to_string()]);
    // Two blank title rows are dropped before detection
    assert_eq!(loaded.header_row, Some(1));
    assert_eq!(loaded.table.labels(), &labels(&PLATFORM_HEADER)[..]);
    assert_eq!(loaded.table.height(), sample_rows().len());
    assert!(loaded.missing_columns().is_empty());
    assert_eq!(
        loaded.column_map.get(CanonicalField::Position),
        Some("Usuario - Puesto")
    );

    let records = classify(&loaded.table, &loaded.column_map).unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(records.totals().pending, 3);
}

#[test]
fn test_load_auto_header_from_file() {
    let file = write_temp_workbook(&single_sheet_workbook(platform_export_rows(1)));
    let mut loader = WorkbookLoader::open(file.path()).unwrap();
    let loaded = loader
        .load_auto_header(
            Some("Reporte"),
            &SynonymCatalog::default(),
            &HeaderDetection::default(),
        )
        .unwrap();

    assert_eq!(loaded.header_row, Some(1));
    assert!(loaded.column_map.is_complete());
}

#[test]
fn test_load_second_sheet_by_name() {
    let bytes = workbook_bytes(&[
        ("Portada", vec![vec!["Resumen"]]),
        ("Detalle", platform_export_rows(0)),
    ]);
    let mut loader = WorkbookLoader::from_bytes(bytes).unwrap();
    assert_eq!(loader.sheet_names(), &["Portada".to_string(), "Detalle".to_string()]);

    let loaded = loader
        .load_auto_header(
            Some("Detalle"),
            &SynonymCatalog::default(),
            &HeaderDetection::default(),
        )
        .unwrap();
    assert_eq!(loaded.sheet_name, "Detalle");
    assert_eq!(loaded.header_row, Some(0));
    assert_eq!(loaded.table.height(), 6);
}

#[test]
fn test_unknown_sheet_lists_available_sheets() {
    let bytes = single_sheet_workbook(platform_export_rows(0));
    let mut loader = WorkbookLoader::from_bytes(bytes).unwrap();
    let result = loader.load_auto_header(
        Some("Hoja1"),
        &SynonymCatalog::default(),
        &HeaderDetection::default(),
    );

    match result {
        Err(ComplianceError::SheetNotFound { sheet, available }) => {
            assert_eq!(sheet, "Hoja1");
            assert_eq!(available, vec!["Reporte".to_string()]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[test]
fn test_empty_sheet_is_rejected() {
    let bytes = workbook_bytes(&[("Vacia", vec![])]);
    let mut loader = WorkbookLoader::from_bytes(bytes).unwrap();
    let result = loader.load_auto_header(
        None,
        &SynonymCatalog::default(),
        &HeaderDetection::default(),
    );
    assert!(matches!(result, Err(ComplianceError::EmptySheet(sheet)) if sheet == "Vacia"));
}

#[test]
fn test_unreadable_bytes_are_a_workbook_error() {
    let result = WorkbookLoader::from_bytes(b"not a spreadsheet".to_vec());
    assert!(matches!(result, Err(ComplianceError::Workbook(_))));
}

#[test]
fn test_headerless_sheet_falls_back_to_first_row() {
    let bytes = single_sheet_workbook(vec![vec!["a", "b"], vec!["1", "2"]]);
    let mut loader = WorkbookLoader::from_bytes(bytes).unwrap();
    let loaded = loader
        .load_auto_header(None, &SynonymCatalog::default(), &HeaderDetection::default())
        .unwrap();

    assert_eq!(loaded.header_row, None);
    assert_eq!(loaded.table.labels(), &labels(&["a", "b"])[..]);
    assert_eq!(loaded.missing_columns().len(), 5);
}

#[test]
fn test_load_fixed_offset_layout() {
    let bytes = single_sheet_workbook(legacy_export_rows());
    let mut loader = WorkbookLoader::from_bytes(bytes).unwrap();
    let loaded = loader
        .load_fixed_offset(None, DEFAULT_SKIP_ROWS, &SynonymCatalog::default())
        .unwrap();

    assert_eq!(loaded.header_row, None);
    assert_eq!(loaded.table.labels().len(), 16);
    assert_eq!(loaded.table.height(), 2);
    assert_eq!(
        loaded.column_map.get(CanonicalField::RecordStatus),
        Some("Estado_Expediente")
    );
    assert_eq!(loaded.column_map.get(CanonicalField::Email), Some("Correo"));

    let records = classify(&loaded.table, &loaded.column_map).unwrap();
    let first = &records.records()[0];
    assert_eq!(first.collaborator, "Ana López");
    assert_eq!(first.branch, "Tesorería");
    assert_eq!(first.course, "PCI DSS VERSIÓN 4.0");
    assert!(first.compliant);
    assert!(records.records()[1].is_pending());
}

#[test]
fn test_cache_reads_each_file_and_sheet_once() {
    let first = single_sheet_workbook(platform_export_rows(2));
    let second = single_sheet_workbook(platform_export_rows(4));
    let mut cache = WorkbookCache::new();
    assert!(cache.is_empty());

    let rows = cache.get_or_read(&first, None).unwrap().len();
    assert_eq!(rows, 9);
    cache.get_or_read(&first, None).unwrap();
    assert_eq!(cache.len(), 1);

    cache.get_or_read(&first, Some("Reporte")).unwrap();
    cache.get_or_read(&second, None).unwrap();
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_cache_miss_propagates_errors() {
    let bytes = single_sheet_workbook(platform_export_rows(0));
    let mut cache = WorkbookCache::new();
    let result = cache.get_or_read(&bytes, Some("Otra"));
    assert!(matches!(result, Err(ComplianceError::SheetNotFound { .. })));
    assert!(cache.is_empty());
}
