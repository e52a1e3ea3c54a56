use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;

use crate::raw_grid::CellValue;

/// Cell texts that spreadsheet exports use to spell "no value"
const NULL_LIKE_TEXT: [&str; 5] = ["nan", "NaN", "None", "NULL", "null"];

/// Produce the comparison-stable form of a free-text value
///
/// Decomposes with NFKD, removes every combining mark, then upper-cases and
/// trims, so `"Dirección "`, `"DIRECCION"` and `"direccion"` all become
/// `"DIRECCION"`. Case folding runs after decomposition because compatibility
/// forms such as `º` and `ª` decompose to lowercase letters. Stripping a mark
/// can expose whitespace that was attached to it (`"a¨"` decomposes to
/// `"a \u{308}"`), hence the final trim.
pub fn normalize_text(value: &str) -> String {
    let stripped: String = value
        .nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect();
    return stripped.to_uppercase().trim().to_string();
}

/// Normalize any cell, coercing it to its text form first. Empty and error cells become `""`.
pub fn normalize_cell(cell: &CellValue) -> String {
    normalize_text(&cell.to_string())
}

/// Element-wise [`normalize_cell`] over a column
pub fn normalize_column(cells: &[CellValue]) -> Vec<String> {
    cells.iter().map(normalize_cell).collect()
}

/// Whether a cell's text carries no value (blank or a null-like spelling such as `nan`)
pub fn is_blank_cell_text(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || NULL_LIKE_TEXT.contains(&trimmed)
}

/// Clean a header label for display and lookup
/// Replaces newlines and control characters with spaces and collapses repeated whitespace
pub fn clean_label(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
