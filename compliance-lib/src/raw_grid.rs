use calamine::Data;
use std::fmt;

use crate::utils::{clean_label, excel_serial_to_datetime, is_blank_cell_text};

/// An untyped spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    /// Date/time rendered as ISO-like text (`2025-01-16 00:00:00`)
    DateTime(String),
    Error,
}

impl CellValue {
    /// Empty, error and whitespace-only cells carry no value
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty | CellValue::Error => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Integer(*i),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Error(_) => CellValue::Error,
            Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
                Some(value) => CellValue::DateTime(value.format("%Y-%m-%d %H:%M:%S").to_string()),
                None => CellValue::Number(dt.as_f64()),
            },
            Data::DateTimeIso(dt_str) => CellValue::DateTime(dt_str.clone()),
            Data::DurationIso(dur_str) => CellValue::Text(dur_str.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty | CellValue::Error => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(n) => {
                if n.is_nan() {
                    Ok(())
                } else if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    // Excel stores integers as floats; print them without a decimal part
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::DateTime(s) => write!(f, "{s}"),
        }
    }
}

/// Headerless rows of a sheet, as read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<CellValue>>,
}

impl RawGrid {
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        RawGrid { rows }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(|row| row.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row length
    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// The first `limit` rows
    pub fn preview(&self, limit: usize) -> RawGrid {
        RawGrid::from_rows(self.rows.iter().take(limit).cloned().collect())
    }

    /// Drop the first `count` rows (positional, blank rows included)
    pub fn skip_rows(&self, count: usize) -> RawGrid {
        RawGrid::from_rows(self.rows.iter().skip(count).cloned().collect())
    }

    /// Drop rows whose cells are all empty
    pub fn without_blank_rows(&self) -> RawGrid {
        RawGrid::from_rows(
            self.rows
                .iter()
                .filter(|row| !row.iter().all(CellValue::is_empty))
                .cloned()
                .collect(),
        )
    }

    /// Use row `header_row` as column labels and the rows after it as data
    ///
    /// With `fill_merged` set, blank labels take the label to their left, the way
    /// merged header cells read back. Blank labels with nothing to their left stay `""`.
    pub fn promote_header(&self, header_row: usize, fill_merged: bool) -> Table {
        let header = self.row(header_row).unwrap_or(&[]);
        let width = self.width();

        let mut labels: Vec<String> = Vec::with_capacity(width);
        let mut last_label: Option<String> = None;
        for col_idx in 0..width {
            let text = header
                .get(col_idx)
                .map(|cell| cell.to_string())
                .unwrap_or_default();
            let mut label = clean_label(&text);
            if is_blank_cell_text(&label) {
                label = String::new();
            }

            if label.is_empty() && fill_merged {
                label = last_label.clone().unwrap_or_default();
            } else if !label.is_empty() {
                last_label = Some(label.clone());
            }
            labels.push(label);
        }

        let rows = self.rows.iter().skip(header_row + 1).cloned().collect();
        Table::new(labels, rows)
    }
}

/// Labelled rows, produced by promoting a header row of a [`RawGrid`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    labels: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(labels: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table { labels, rows }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column carrying exactly `label`
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Cell at (`row`, `col`); short rows read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    /// All cells of the column labelled `label`
    pub fn column(&self, label: &str) -> Option<Vec<CellValue>> {
        let col_idx = self.column_index(label)?;
        Some(
            (0..self.rows.len())
                .map(|row| self.cell(row, col_idx).clone())
                .collect(),
        )
    }

    /// Remove columns whose data cells are all empty
    pub fn drop_empty_columns(self) -> Table {
        if self.rows.is_empty() {
            return self;
        }
        let keep: Vec<usize> = (0..self.labels.len())
            .filter(|col_idx| {
                self.rows
                    .iter()
                    .any(|row| row.get(*col_idx).is_some_and(|cell| !cell.is_empty()))
            })
            .collect();

        let labels = keep.iter().map(|i| self.labels[*i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                keep.iter()
                    .map(|i| row.get(*i).cloned().unwrap_or(CellValue::Empty))
                    .collect()
            })
            .collect();
        Table::new(labels, rows)
    }
}
