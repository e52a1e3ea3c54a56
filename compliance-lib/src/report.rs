//! Report tables fed to the dashboard export, the detail listing and the
//! writers for both.

use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::aggregator::{GroupBy, SummaryRow, aggregate};
use crate::classifier::RecordTable;
use crate::error::Result;
use crate::utils::{normalize_text, report_date_today};

/// Row substituted when a table has nothing pending, so exports are never empty
pub const NO_PENDING_PLACEHOLDER: &str = "(Sin pendientes)";

const SHEET_NAME: &str = "Dashboard Dirección";
const TITLE: &str = "CURSOS PENDIENTES POR DIRECCIÓN";
const AREA_SECTION_TITLE: &str = "Cursos Pendientes por Área";
const COURSE_HEADERS: [&str; 3] = ["Curso", "Pendientes", "% Pendientes"];
const AREA_HEADERS: [&str; 2] = ["Área", "Pendientes"];
const DETAIL_HEADERS: [&str; 5] = [
    "Sucursal",
    "Nombre_Colaborador",
    "Curso",
    "Estado_Expediente",
    "Es_Pendiente",
];

const COURSE_TABLE_ROW: u32 = 4;
const AREA_SECTION_ROW: u32 = 11;
const SIDE_COLUMN: u16 = 5;

const HEADER_FILL: u32 = 0x800080;
const TOTAL_FILL: u32 = 0xFF4D6D;
const WHITE: u32 = 0xFFFFFF;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseExportRow {
    pub course: String,
    pub pending: usize,
    /// Pending share of the course's records, e.g. `"33.3 %"`
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaExportRow {
    pub area: String,
    pub pending: usize,
}

/// `pending / total` as a one-decimal percentage; `"0 %"` when there are no records
pub fn format_percentage(pending: usize, total: usize) -> String {
    if total == 0 {
        return "0 %".to_string();
    }
    format!("{:.1} %", pending as f64 / total as f64 * 100.0)
}

/// Courses with pending records, from a by-course summary
pub fn course_export_table(summary: &[SummaryRow]) -> Vec<CourseExportRow> {
    let mut rows: Vec<CourseExportRow> = summary
        .iter()
        .filter(|row| row.pending > 0)
        .map(|row| CourseExportRow {
            course: row.label().to_string(),
            pending: row.pending,
            percentage: format_percentage(row.pending, row.total),
        })
        .collect();

    if rows.is_empty() {
        rows.push(CourseExportRow {
            course: NO_PENDING_PLACEHOLDER.to_string(),
            pending: 0,
            percentage: "0 %".to_string(),
        });
    }
    rows
}

/// Areas (branches) with pending records, from a by-branch summary
pub fn area_export_table(summary: &[SummaryRow]) -> Vec<AreaExportRow> {
    let mut rows: Vec<AreaExportRow> = summary
        .iter()
        .filter(|row| row.pending > 0)
        .map(|row| AreaExportRow {
            area: row.label().to_string(),
            pending: row.pending,
        })
        .collect();

    if rows.is_empty() {
        rows.push(AreaExportRow {
            area: NO_PENDING_PLACEHOLDER.to_string(),
            pending: 0,
        });
    }
    rows
}

/// One line of the per-collaborator listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub branch: String,
    pub collaborator: String,
    pub course: String,
    pub status: String,
    pub pending: bool,
}

/// Every record, sorted by branch, collaborator and course
pub fn detail_rows(records: &RecordTable) -> Vec<DetailRow> {
    let mut rows: Vec<DetailRow> = records
        .iter()
        .map(|record| DetailRow {
            branch: record.branch.clone(),
            collaborator: record.collaborator.clone(),
            course: record.course.clone(),
            status: record.status.clone(),
            pending: record.is_pending(),
        })
        .collect();
    rows.sort_by(|a, b| {
        (&a.branch, &a.collaborator, &a.course).cmp(&(&b.branch, &b.collaborator, &b.course))
    });
    rows
}

/// Only the pending records, sorted like [`detail_rows`]
pub fn pending_detail(records: &RecordTable) -> Vec<DetailRow> {
    detail_rows(&records.pending())
}

/// Write detail rows to a CSV file
pub fn export_detail_csv(rows: &[DetailRow], csv_path: impl AsRef<Path>) -> Result<()> {
    // Quote fields only when necessary (e.g., when they contain commas)
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(csv_path.as_ref())?;

    // Header goes first even when there are no rows
    wtr.write_record(DETAIL_HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    info!(path = %csv_path.as_ref().display(), rows = rows.len(), "detail CSV written");
    Ok(())
}

/// File name offered for a direction's dashboard
pub fn suggested_file_name(direction: &str) -> String {
    format!("Reporte_Visual_{}.xlsx", normalize_text(direction).replace(' ', "_"))
}

/// The pending-courses dashboard of one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardReport {
    pub direction: String,
    pub total_pending: usize,
    pub courses: Vec<CourseExportRow>,
    pub areas: Vec<AreaExportRow>,
    /// Date printed in the corner; today when unset
    pub date_text: Option<String>,
}

struct DashboardFormats {
    title: Format,
    subtitle: Format,
    date: Format,
    total: Format,
    header: Format,
    cell: Format,
    bold: Format,
}

impl DashboardFormats {
    fn new() -> Self {
        let center = Format::new()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        DashboardFormats {
            title: center.clone().set_bold().set_font_size(14),
            subtitle: center.clone().set_bold(),
            date: Format::new().set_align(FormatAlign::Right),
            total: center
                .clone()
                .set_bold()
                .set_font_size(14)
                .set_font_color(WHITE)
                .set_background_color(TOTAL_FILL),
            header: center
                .clone()
                .set_bold()
                .set_font_color(WHITE)
                .set_background_color(HEADER_FILL),
            cell: center,
            bold: Format::new().set_bold(),
        }
    }
}

impl DashboardReport {
    /// Build the dashboard tables from the already-filtered records of a direction
    pub fn from_records(direction: &str, records: &RecordTable) -> Self {
        let by_course = aggregate(records, GroupBy::Course);
        let by_branch = aggregate(records, GroupBy::DirectionBranch);

        DashboardReport {
            direction: direction.to_string(),
            total_pending: records.totals().pending,
            courses: course_export_table(&by_course),
            areas: area_export_table(&by_branch),
            date_text: None,
        }
    }

    pub fn with_date(mut self, date_text: impl Into<String>) -> Self {
        self.date_text = Some(date_text.into());
        self
    }

    /// Row where the area section starts; pushed down when the course table is long
    fn area_section_row(&self) -> u32 {
        let course_end = COURSE_TABLE_ROW + self.courses.len() as u32;
        AREA_SECTION_ROW.max(course_end + 1)
    }

    pub fn to_workbook(&self) -> Result<Workbook> {
        let formats = DashboardFormats::new();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        // Title block
        worksheet.merge_range(0, 0, 0, 3, TITLE, &formats.title)?;
        worksheet.merge_range(
            1,
            0,
            1,
            3,
            &format!("DIRECCIÓN: {}", self.direction),
            &formats.subtitle,
        )?;

        // Date and total counter
        let date_text = self.date_text.clone().unwrap_or_else(report_date_today);
        worksheet.write_string_with_format(0, SIDE_COLUMN, &date_text, &formats.date)?;
        worksheet.write_string(1, SIDE_COLUMN, "Total pendientes")?;
        worksheet.write_number_with_format(
            2,
            SIDE_COLUMN,
            self.total_pending as f64,
            &formats.total,
        )?;

        // Pending by course
        for (col, header) in COURSE_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(COURSE_TABLE_ROW, col as u16, *header, &formats.header)?;
        }
        for (i, row) in self.courses.iter().enumerate() {
            let excel_row = COURSE_TABLE_ROW + 1 + i as u32;
            worksheet.write_string_with_format(excel_row, 0, &row.course, &formats.cell)?;
            worksheet.write_number_with_format(excel_row, 1, row.pending as f64, &formats.cell)?;
            worksheet.write_string_with_format(excel_row, 2, &row.percentage, &formats.cell)?;
        }

        // Pending by area
        let area_row = self.area_section_row();
        worksheet.write_string_with_format(area_row, 0, AREA_SECTION_TITLE, &formats.bold)?;
        for (col, header) in AREA_HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(area_row + 1, col as u16, *header, &formats.header)?;
        }
        for (i, row) in self.areas.iter().enumerate() {
            let excel_row = area_row + 2 + i as u32;
            worksheet.write_string_with_format(excel_row, 0, &row.area, &formats.cell)?;
            worksheet.write_number_with_format(excel_row, 1, row.pending as f64, &formats.cell)?;
        }

        worksheet.set_column_width(0, 55)?;
        worksheet.set_column_width(1, 18)?;
        worksheet.set_column_width(2, 18)?;
        worksheet.set_column_width(SIDE_COLUMN, 25)?;

        Ok(workbook)
    }

    pub fn to_buffer(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref())?;
        info!(path = %path.as_ref().display(), "dashboard workbook written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1, 3), "33.3 %");
        assert_eq!(format_percentage(6, 6), "100.0 %");
        assert_eq!(format_percentage(0, 0), "0 %");
    }

    #[test]
    fn test_course_export_table_skips_groups_without_pending() {
        let records = records_from(&[
            ("Ana", "Finanzas", "Centro", "PCI", "En proceso"),
            ("Luis", "Finanzas", "Centro", "PCI", "Terminado"),
            ("Eva", "Finanzas", "Centro", "Ética", "Terminado"),
        ]);
        let table = course_export_table(&aggregate(&records, GroupBy::Course));
        assert_eq!(
            table,
            vec![CourseExportRow {
                course: "PCI".to_string(),
                pending: 1,
                percentage: "50.0 %".to_string(),
            }]
        );
    }

    #[test]
    fn test_export_tables_use_placeholder_when_nothing_pending() {
        let courses = course_export_table(&[]);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course, NO_PENDING_PLACEHOLDER);
        assert_eq!(courses[0].pending, 0);
        assert_eq!(courses[0].percentage, "0 %");

        let areas = area_export_table(&[]);
        assert_eq!(
            areas,
            vec![AreaExportRow {
                area: NO_PENDING_PLACEHOLDER.to_string(),
                pending: 0,
            }]
        );
    }

    #[test]
    fn test_area_export_table_uses_branch_names() {
        let records = records_from(&[
            ("Ana", "Operaciones", "Operaciones Emisión", "PCI", "En proceso"),
            ("Luis", "Operaciones", "Centro de Contacto", "PCI", "Terminado"),
        ]);
        let areas = area_export_table(&aggregate(&records, GroupBy::DirectionBranch));
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].area, "Operaciones Emisión");
    }

    #[test]
    fn test_detail_rows_sorted() {
        let records = records_from(&[
            ("Luis", "Finanzas", "Norte", "PCI", "En proceso"),
            ("Ana", "Finanzas", "Norte", "Ética", "Terminado"),
            ("Ana", "Finanzas", "Centro", "PCI", "En proceso"),
        ]);
        let rows = detail_rows(&records);
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.branch.as_str(), row.collaborator.as_str()))
            .collect();
        assert_eq!(order, vec![("Centro", "Ana"), ("Norte", "Ana"), ("Norte", "Luis")]);

        let pending = pending_detail(&records);
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|row| row.pending));
    }

    #[test]
    fn test_suggested_file_name() {
        assert_eq!(
            suggested_file_name("Dirección de Operaciones"),
            "Reporte_Visual_DIRECCION_DE_OPERACIONES.xlsx"
        );
    }

    #[test]
    fn test_dashboard_from_empty_records() {
        let report = DashboardReport::from_records("Finanzas", &RecordTable::default());
        assert_eq!(report.total_pending, 0);
        assert_eq!(report.courses[0].course, NO_PENDING_PLACEHOLDER);
        assert_eq!(report.areas[0].area, NO_PENDING_PLACEHOLDER);
        assert!(report.to_buffer().is_ok());
    }

    #[test]
    fn test_area_section_moves_below_long_course_table() {
        let mut report = DashboardReport::from_records("Finanzas", &sample_records());
        assert_eq!(report.area_section_row(), AREA_SECTION_ROW);

        report.courses = (0..10)
            .map(|i| CourseExportRow {
                course: format!("Curso {i}"),
                pending: 1,
                percentage: "100.0 %".to_string(),
            })
            .collect();
        assert_eq!(report.area_section_row(), COURSE_TABLE_ROW + 10 + 1);
    }
}
