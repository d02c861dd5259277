//! Rendering of reports and diagnostics for the terminal

mod table;

pub use table::render_table;

use anyhow::{Context, Result};
use colored::*;
use is_terminal::IsTerminal;

use crate::export::export_csv;
use crate::tracking::{LoadDiagnostics, Report};

/// How a report is written to stdout or `--output`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    Csv,
    /// Pretty-printed JSON
    Json,
}

/// Disable colors for `--no-color` or when stdout is not a terminal
pub fn configure_colors(no_color: bool) {
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Render a report in the requested format
pub fn format_report(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_report_table(report)),
        OutputFormat::Csv => {
            let bytes = export_csv(&report.table)?;
            String::from_utf8(bytes).context("CSV output is not valid UTF-8")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to format JSON output")
        }
    }
}

fn format_report_table(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", report.title.bold()));

    if report.is_empty() {
        out.push_str(&format!("{}\n", report.kind.not_found_message().yellow()));
    } else {
        out.push_str(&render_table(&report.table));
        out.push_str(&format!("\n{} rows\n", report.table.len().to_string().cyan()));
    }

    if report.skipped > 0 {
        out.push_str(&format!(
            "{}\n",
            format!("{} rows skipped because their date is missing or invalid", report.skipped)
                .yellow()
        ));
    }
    out
}

/// Human-readable summary of what loading had to tolerate
pub fn format_diagnostics(diagnostics: &LoadDiagnostics) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Data source loaded".green().bold()));
    out.push_str(&format!(
        "  PROCESO: {} rows (key {})\n",
        diagnostics.movement_rows, diagnostics.movement_key
    ));
    out.push_str(&format!(
        "  DETALLE: {} rows (key {})\n",
        diagnostics.detail_rows, diagnostics.detail_key
    ));

    let warnings = [
        (diagnostics.undated_movements, "movements with a missing or invalid FECHA"),
        (diagnostics.movements_without_id, "movements without an id"),
        (diagnostics.unknown_processes, "movements with an unknown process type"),
        (diagnostics.details_without_serial, "unit rows without a SERIE"),
        (diagnostics.orphan_details, "unit rows whose movement id matches no movement"),
    ];
    for (count, what) in warnings {
        if count > 0 {
            out.push_str(&format!("  {} {}\n", count.to_string().yellow(), what));
        }
    }
    for sample in &diagnostics.undated_samples {
        out.push_str(&format!("    {}\n", sample.dimmed()));
    }
    out
}
