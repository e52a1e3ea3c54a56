use compliance_lib::{CanonicalField, GroupBy, SummaryRow};

use crate::model::ReportOutcome;

/// Printed in place of a table body when there is nothing to list
pub const EMPTY_TABLE_TEXT: &str = "(sin registros)";

/// Left-aligned plain-text table, columns separated by two spaces
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(value.chars().count());
            }
        }
    }

    let format_line = |values: Vec<&str>| -> String {
        let cells: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(value, width)| {
                let padding = width.saturating_sub(value.chars().count());
                format!("{}{}", value, " ".repeat(padding))
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    };

    let mut lines = vec![format_line(headers.to_vec())];
    if rows.is_empty() {
        lines.push(EMPTY_TABLE_TEXT.to_string());
    }
    for row in rows {
        lines.push(format_line(row.iter().map(|v| v.as_str()).collect()));
    }
    return lines.join("\n");
}

/// Group keys followed by the `Cursos_Pendientes` count
pub fn render_pending_table(group_by: GroupBy, summary: &[SummaryRow]) -> String {
    let mut headers = group_by.key_labels().to_vec();
    headers.push("Cursos_Pendientes");
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|row| {
            let mut values = row.keys.clone();
            values.push(row.pending.to_string());
            values
        })
        .collect();
    render_table(&headers, &rows)
}

/// Group keys followed by total, compliant and pending counts
pub fn render_totals_table(group_by: GroupBy, summary: &[SummaryRow]) -> String {
    let mut headers = group_by.key_labels().to_vec();
    headers.extend(["Total", "Cumplidos", "Pendientes"]);
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|row| {
            let mut values = row.keys.clone();
            values.push(row.total.to_string());
            values.push(row.compliant.to_string());
            values.push(row.pending.to_string());
            values
        })
        .collect();
    render_table(&headers, &rows)
}

/// What the operator needs to answer an incomplete automatic mapping
pub fn mapping_hint(missing: &[CanonicalField], labels: &[String]) -> String {
    let missing: Vec<&str> = missing.iter().map(|field| field.label()).collect();
    format!(
        "Columns not found: {}. Columns in the file: {}. Answer with --column FIELD=LABEL",
        missing.join(", "),
        labels.join(", ")
    )
}

/// The full console report of one direction
pub fn render_report(outcome: &ReportOutcome) -> String {
    let mut text = String::new();
    text.push_str("\n=== Resumen ===\n");
    text.push_str(&format!("Dirección: {}\n", outcome.direction));
    text.push_str(&format!("Total registros: {}\n", outcome.totals.total));
    text.push_str(&format!(
        "Cumplidos (incluye EXENCIÓN): {}\n",
        outcome.totals.compliant
    ));
    text.push_str(&format!("Pendientes: {}\n", outcome.totals.pending));

    let sections = [
        (
            "Pendientes por Dirección",
            render_pending_table(GroupBy::Direction, &outcome.pending_by_direction),
        ),
        (
            "Pendientes por Sucursal",
            render_pending_table(GroupBy::DirectionBranch, &outcome.pending_by_branch),
        ),
        (
            "Pendientes por Curso",
            render_pending_table(GroupBy::Course, &outcome.pending_by_course),
        ),
        (
            "Resumen por Curso",
            render_totals_table(GroupBy::Course, &outcome.course_summary),
        ),
        (
            "Resumen por Sucursal",
            render_totals_table(GroupBy::DirectionBranch, &outcome.branch_summary),
        ),
    ];
    for (title, table) in sections {
        text.push_str(&format!("\n=== {title} ===\n{table}\n"));
    }
    text
}
