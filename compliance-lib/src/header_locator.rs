use std::collections::HashSet;
use tracing::debug;

use crate::raw_grid::{CellValue, RawGrid};
use crate::synonyms::SynonymCatalog;
use crate::utils::{is_blank_cell_text, normalize_text};

/// Rows read without a header before detection runs
pub const DEFAULT_PREVIEW_ROWS: usize = 120;
/// Rows of the preview that are scored as header candidates
pub const DEFAULT_SCAN_LIMIT: usize = 80;
/// Minimum distinct synonym hits for a row to count as the header
pub const DEFAULT_MIN_SCORE: usize = 2;

/// Header detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDetection {
    pub preview_rows: usize,
    pub scan_limit: usize,
    pub min_score: usize,
}

impl Default for HeaderDetection {
    fn default() -> Self {
        HeaderDetection {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            scan_limit: DEFAULT_SCAN_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl HeaderDetection {
    /// Run [`locate_header`] over the preview window of `grid`
    pub fn locate(&self, grid: &RawGrid, catalog: &SynonymCatalog) -> Option<usize> {
        let preview = grid.preview(self.preview_rows);
        locate_header(&preview, catalog, self.scan_limit, self.min_score)
    }
}

/// Normalized form of every synonym in the catalog
pub fn expected_labels(catalog: &SynonymCatalog) -> HashSet<String> {
    catalog.all_labels().map(normalize_text).collect()
}

/// Number of distinct expected labels present in `row`
///
/// Blank and null-like cells are ignored; a label repeated across cells counts once.
pub fn score_row(row: &[CellValue], expected: &HashSet<String>) -> usize {
    let row_labels: HashSet<String> = row
        .iter()
        .map(|cell| cell.to_string())
        .filter(|text| !is_blank_cell_text(text))
        .map(|text| normalize_text(&text))
        .collect();

    row_labels.intersection(expected).count()
}

/// Find the row that looks most like a header
///
/// Scores the first `scan_limit` rows against the catalog's synonyms and returns the
/// first row with the highest score, provided it reaches `min_score`.
pub fn locate_header(
    grid: &RawGrid,
    catalog: &SynonymCatalog,
    scan_limit: usize,
    min_score: usize,
) -> Option<usize> {
    let expected = expected_labels(catalog);

    let mut best: Option<(usize, usize)> = None;
    let limit = scan_limit.min(grid.len());
    for (row_index, row) in grid.rows().iter().take(limit).enumerate() {
        let score = score_row(row, &expected);
        // Ties keep the earlier row
        if score > best.map_or(0, |(_, best_score)| best_score) {
            best = Some((row_index, score));
        }
    }

    match best {
        Some((row_index, score)) if score >= min_score => {
            debug!(row = row_index, score, "header row located");
            Some(row_index)
        }
        _ => {
            debug!(best = ?best, min_score, "no row reached the header threshold");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_locate_header_after_title_rows() {
        let grid = grid_from(&[
            &["Reporte de capacitación"],
            &["Generado el 16/01/2025"],
            &["Nombre", "Dirección", "Sucursal", "Curso", "Estado"],
            &["Ana", "Finanzas", "Centro", "PCI DSS", "Terminado"],
        ]);
        let catalog = SynonymCatalog::default();
        assert_eq!(locate_header(&grid, &catalog, 80, 2), Some(2));
    }

    #[test]
    fn test_locate_header_empty_grid() {
        let catalog = SynonymCatalog::default();
        assert_eq!(locate_header(&RawGrid::default(), &catalog, 80, 2), None);
    }

    #[test]
    fn test_locate_header_below_threshold() {
        let grid = grid_from(&[&["Reporte"], &["Curso", "Otro dato"], &["x", "y"]]);
        let catalog = SynonymCatalog::default();
        assert_eq!(locate_header(&grid, &catalog, 80, 2), None);
        assert_eq!(locate_header(&grid, &catalog, 80, 1), Some(1));
    }

    #[test]
    fn test_locate_header_first_row_wins_ties() {
        let grid = grid_from(&[&["Curso", "Estado"], &["Nombre", "Sucursal"]]);
        let catalog = SynonymCatalog::default();
        assert_eq!(locate_header(&grid, &catalog, 80, 2), Some(0));
    }

    #[test]
    fn test_locate_header_respects_scan_limit() {
        let grid = grid_from(&[
            &["titulo"],
            &["titulo"],
            &["Nombre", "Dirección", "Curso"],
        ]);
        let catalog = SynonymCatalog::default();
        assert_eq!(locate_header(&grid, &catalog, 2, 2), None);
        assert_eq!(locate_header(&grid, &catalog, 3, 2), Some(2));
    }

    #[test]
    fn test_score_row_uses_set_semantics_and_ignores_blanks() {
        let expected = expected_labels(&SynonymCatalog::default());
        let row = cells(&["Curso", "CURSO", " curso ", "nan", "None", "", "Estado"]);
        assert_eq!(score_row(&row, &expected), 2);
    }

    #[test]
    fn test_score_row_matches_accent_and_case_variants() {
        let expected = expected_labels(&SynonymCatalog::default());
        let row = cells(&["DIRECCION", "área", "capacitacion"]);
        assert_eq!(score_row(&row, &expected), 3);
    }

    #[test]
    fn test_detection_defaults_cap_scan_to_preview() {
        let detection = HeaderDetection {
            preview_rows: 1,
            ..HeaderDetection::default()
        };
        let grid = grid_from(&[&["titulo"], &["Nombre", "Curso", "Estado"]]);
        assert_eq!(detection.locate(&grid, &SynonymCatalog::default()), None);
        assert_eq!(
            HeaderDetection::default().locate(&grid, &SynonymCatalog::default()),
            Some(1)
        );
    }
}
