//! Plain-text table layout
//!
//! Column widths are measured in terminal cells (`unicode-width`), so names
//! with accents or wide characters still line up.

use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::tracking::ReportTable;

const GAP: &str = "  ";

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn column_widths(table: &ReportTable) -> Vec<usize> {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.width()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }
    widths
}

/// Render a table with a bold header and a rule beneath it
pub fn render_table(table: &ReportTable) -> String {
    let widths = column_widths(table);
    let mut out = String::new();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| pad(name, *w).bold().to_string())
        .collect();
    out.push_str(header.join(GAP).trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join(GAP).dimmed().to_string());
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect();
        out.push_str(cells.join(GAP).trim_end());
        out.push('\n');
    }

    out
}
