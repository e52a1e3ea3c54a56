use calamine::{Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::column_mapper::{ColumnMap, build_column_map};
use crate::error::{ComplianceError, Result};
use crate::header_locator::HeaderDetection;
use crate::raw_grid::{CellValue, RawGrid, Table};
use crate::synonyms::{CanonicalField, LEGACY_COLUMN_LAYOUT, SynonymCatalog};

/// Title rows above the header in the fixed-layout export
pub const DEFAULT_SKIP_ROWS: usize = 9;

/// A sheet turned into a labelled table, with its automatic column mapping
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSheet {
    pub sheet_name: String,
    pub sheet_names: Vec<String>,
    /// Detected header row (index among non-blank rows); `None` when the first row was used
    pub header_row: Option<usize>,
    pub table: Table,
    pub column_map: ColumnMap,
}

impl LoadedSheet {
    /// Columns the automatic mapping could not resolve
    pub fn missing_columns(&self) -> Vec<CanonicalField> {
        self.column_map.missing()
    }
}

/// Find the header with [`HeaderDetection`] and build the table under it
///
/// Falls back to the first non-blank row when no row scores high enough.
pub fn auto_header_table(
    grid: &RawGrid,
    catalog: &SynonymCatalog,
    detection: &HeaderDetection,
) -> (Table, Option<usize>) {
    let grid = grid.without_blank_rows();
    if grid.is_empty() {
        return (Table::default(), None);
    }

    match detection.locate(&grid, catalog) {
        Some(header_row) => {
            let table = grid.promote_header(header_row, true).drop_empty_columns();
            (table, Some(header_row))
        }
        None => {
            warn!("header row not detected, using the first row as header");
            (grid.promote_header(0, false), None)
        }
    }
}

/// Legacy layout: skip `skip_rows` rows, drop the header row under them and name
/// the columns positionally
pub fn fixed_offset_table(grid: &RawGrid, skip_rows: usize) -> Table {
    let rest = grid.skip_rows(skip_rows).without_blank_rows();
    let width = rest.width().min(LEGACY_COLUMN_LAYOUT.len());
    if rest.width() > LEGACY_COLUMN_LAYOUT.len() {
        warn!(
            columns = rest.width(),
            kept = LEGACY_COLUMN_LAYOUT.len(),
            "extra columns beyond the fixed layout are ignored"
        );
    }

    let labels = LEGACY_COLUMN_LAYOUT[..width]
        .iter()
        .map(|label| label.to_string())
        .collect();
    let rows = rest
        .rows()
        .iter()
        .skip(1)
        .map(|row| row.iter().take(width).cloned().collect())
        .collect();
    Table::new(labels, rows)
}

/// Reads sheets of one workbook (xlsx, xls, ods) through calamine
pub struct WorkbookLoader<RS> {
    workbook: Sheets<RS>,
    sheet_names: Vec<String>,
}

impl WorkbookLoader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let workbook = open_workbook_auto(path.as_ref()).map_err(|e| {
            ComplianceError::Workbook(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Ok(WorkbookLoader::from_sheets(workbook))
    }
}

impl WorkbookLoader<Cursor<Vec<u8>>> {
    /// Workbook held in memory (e.g. an uploaded file)
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        Ok(WorkbookLoader::from_sheets(workbook))
    }
}

impl<RS: Read + Seek> WorkbookLoader<RS> {
    fn from_sheets(workbook: Sheets<RS>) -> Self {
        let sheet_names = workbook.sheet_names();
        WorkbookLoader {
            workbook,
            sheet_names,
        }
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// The requested sheet, or the first one when none is given
    pub fn resolve_sheet(&self, sheet: Option<&str>) -> Result<String> {
        match sheet {
            Some(name) => {
                if self.sheet_names.iter().any(|s| s == name) {
                    Ok(name.to_string())
                } else {
                    Err(ComplianceError::SheetNotFound {
                        sheet: name.to_string(),
                        available: self.sheet_names.clone(),
                    })
                }
            }
            None => self
                .sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ComplianceError::Workbook("workbook has no sheets".to_string())),
        }
    }

    /// Every row of a sheet, without assuming a header
    ///
    /// Rows and columns keep their sheet positions: leading empty rows and
    /// columns are padded back in.
    pub fn read_grid(&mut self, sheet: &str) -> Result<RawGrid> {
        let range = self.workbook.worksheet_range(sheet).map_err(|e| {
            ComplianceError::Workbook(format!("Error reading sheet '{}': {}", sheet, e))
        })?;

        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; start_col as usize];
            cells.extend(row.iter().map(CellValue::from));
            rows.push(cells);
        }

        debug!(sheet, rows = rows.len(), "sheet read");
        Ok(RawGrid::from_rows(rows))
    }

    fn read_non_empty_grid(&mut self, sheet: &str) -> Result<RawGrid> {
        let grid = self.read_grid(sheet)?;
        if grid.without_blank_rows().is_empty() {
            return Err(ComplianceError::EmptySheet(sheet.to_string()));
        }
        Ok(grid)
    }

    /// Load a sheet by detecting its header row and mapping columns by synonym
    pub fn load_auto_header(
        &mut self,
        sheet: Option<&str>,
        catalog: &SynonymCatalog,
        detection: &HeaderDetection,
    ) -> Result<LoadedSheet> {
        let sheet_name = self.resolve_sheet(sheet)?;
        let grid = self.read_non_empty_grid(&sheet_name)?;
        let (table, header_row) = auto_header_table(&grid, catalog, detection);
        let column_map = build_column_map(table.labels(), catalog);

        info!(
            sheet = %sheet_name,
            header_row = ?header_row,
            rows = table.height(),
            "sheet loaded with detected header"
        );
        Ok(LoadedSheet {
            sheet_name,
            sheet_names: self.sheet_names.clone(),
            header_row,
            table,
            column_map,
        })
    }

    /// Load a sheet in the fixed-layout mode
    pub fn load_fixed_offset(
        &mut self,
        sheet: Option<&str>,
        skip_rows: usize,
        catalog: &SynonymCatalog,
    ) -> Result<LoadedSheet> {
        let sheet_name = self.resolve_sheet(sheet)?;
        let grid = self.read_non_empty_grid(&sheet_name)?;
        let table = fixed_offset_table(&grid, skip_rows);
        let column_map = build_column_map(table.labels(), catalog);

        info!(
            sheet = %sheet_name,
            skip_rows,
            rows = table.height(),
            "sheet loaded with fixed layout"
        );
        Ok(LoadedSheet {
            sheet_name,
            sheet_names: self.sheet_names.clone(),
            header_row: None,
            table,
            column_map,
        })
    }
}

/// Identity of an uploaded file: a hash of its bytes
pub fn file_identity(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// Memoized sheet reads keyed by file identity and requested sheet
///
/// Entries are never evicted. Reading is pure given the same bytes, so a miss just
/// reads again.
#[derive(Debug, Default)]
pub struct WorkbookCache {
    grids: HashMap<(u64, Option<String>), RawGrid>,
}

impl WorkbookCache {
    pub fn new() -> Self {
        WorkbookCache::default()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn get_or_read(&mut self, bytes: &[u8], sheet: Option<&str>) -> Result<&RawGrid> {
        let key = (file_identity(bytes), sheet.map(|s| s.to_string()));
        if !self.grids.contains_key(&key) {
            let mut loader = WorkbookLoader::from_bytes(bytes.to_vec())?;
            let sheet_name = loader.resolve_sheet(sheet)?;
            let grid = loader.read_grid(&sheet_name)?;
            debug!(identity = key.0, sheet = %sheet_name, "workbook cache miss");
            self.grids.insert(key.clone(), grid);
        }
        Ok(&self.grids[&key])
    }
}
