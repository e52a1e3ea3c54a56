use compliance_lib::report::{DetailRow, pending_detail};
use compliance_lib::workbook::DEFAULT_SKIP_ROWS;
use compliance_lib::{
    CanonicalField, ColumnResolution, CourseFilter, DashboardReport, GroupBy, HeaderDetection,
    LoadedSheet, RecordTable, Result, SummaryRow, SynonymCatalog, Totals, WorkbookLoader,
    aggregate, classify, distinct_directions, filter_direction,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::utils::mapping_hint;

/// How the table is located inside the sheet
#[derive(Debug, Clone, PartialEq)]
pub enum IngestionMode {
    /// Legacy layout: skip this many rows, then positional column names
    FixedOffset(usize),
    /// Header row detected by synonym score
    AutoHeader(HeaderDetection),
}

impl Default for IngestionMode {
    fn default() -> Self {
        IngestionMode::FixedOffset(DEFAULT_SKIP_ROWS)
    }
}

/// One report request: which file, which direction, which courses
#[derive(Debug, Clone)]
pub struct ReportRun {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub mode: IngestionMode,
    pub direction: String,
    pub course_filter: CourseFilter,
    pub catalog: SynonymCatalog,
    /// Operator answers for columns the automatic mapping missed
    pub resolutions: Vec<(CanonicalField, ColumnResolution)>,
}

/// Everything printed or exported for one direction
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub sheet_name: String,
    pub header_row: Option<usize>,
    pub direction: String,
    pub totals: Totals,
    pub pending_by_direction: Vec<SummaryRow>,
    pub pending_by_branch: Vec<SummaryRow>,
    pub pending_by_course: Vec<SummaryRow>,
    pub course_summary: Vec<SummaryRow>,
    pub branch_summary: Vec<SummaryRow>,
    /// Directions present in the file, offered when the selection is empty
    pub available_directions: Vec<String>,
    #[serde(skip)]
    pub records: RecordTable,
}

impl ReportRun {
    pub fn new(file: impl AsRef<Path>, direction: &str) -> Self {
        ReportRun {
            file: file.as_ref().to_path_buf(),
            sheet: None,
            mode: IngestionMode::default(),
            direction: direction.to_string(),
            course_filter: CourseFilter::All,
            catalog: SynonymCatalog::default(),
            resolutions: Vec::new(),
        }
    }

    pub fn sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn mode(mut self, mode: IngestionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn course_filter(mut self, course_filter: CourseFilter) -> Self {
        self.course_filter = course_filter;
        self
    }

    pub fn resolutions(mut self, resolutions: Vec<(CanonicalField, ColumnResolution)>) -> Self {
        self.resolutions = resolutions;
        self
    }

    /// Read the sheet into a labelled table with its automatic column map
    pub fn load(&self) -> Result<LoadedSheet> {
        let mut loader = WorkbookLoader::open(&self.file)?;
        let sheet = self.sheet.as_deref();
        match &self.mode {
            IngestionMode::FixedOffset(skip_rows) => {
                loader.load_fixed_offset(sheet, *skip_rows, &self.catalog)
            }
            IngestionMode::AutoHeader(detection) => {
                loader.load_auto_header(sheet, &self.catalog, detection)
            }
        }
    }

    pub fn execute(&self) -> Result<ReportOutcome> {
        let loaded = self.load()?;
        let mut column_map = loaded.column_map.clone();
        if !self.resolutions.is_empty() {
            column_map = column_map.resolve_manually(&self.resolutions, loaded.table.labels())?;
        } else if !column_map.is_complete() {
            warn!(
                missing = ?column_map.missing(),
                "automatic column mapping is incomplete. {}",
                mapping_hint(&column_map.missing(), loaded.table.labels())
            );
        }

        let records = classify(&loaded.table, &column_map)?;
        Ok(self.summarize(&loaded, &records))
    }

    fn summarize(&self, loaded: &LoadedSheet, records: &RecordTable) -> ReportOutcome {
        let selected = self
            .course_filter
            .apply(&filter_direction(records, &self.direction));
        let pending = selected.pending();

        let available_directions = distinct_directions(records);
        if selected.is_empty() {
            warn!(direction = %self.direction, "no records for the selected direction");
        }
        info!(
            direction = %self.direction,
            records = selected.len(),
            pending = pending.len(),
            "direction selected"
        );

        ReportOutcome {
            sheet_name: loaded.sheet_name.clone(),
            header_row: loaded.header_row,
            direction: self.direction.clone(),
            totals: selected.totals(),
            pending_by_direction: aggregate(&pending, GroupBy::Direction),
            pending_by_branch: aggregate(&pending, GroupBy::DirectionBranch),
            pending_by_course: aggregate(&pending, GroupBy::Course),
            course_summary: aggregate(&selected, GroupBy::Course),
            branch_summary: aggregate(&selected, GroupBy::DirectionBranch),
            available_directions,
            records: selected,
        }
    }
}

impl ReportOutcome {
    pub fn dashboard(&self) -> DashboardReport {
        DashboardReport::from_records(&self.direction, &self.records)
    }

    pub fn pending_detail(&self) -> Vec<DetailRow> {
        pending_detail(&self.records)
    }
}
