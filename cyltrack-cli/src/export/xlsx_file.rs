//! Excel workbook export of a report

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use crate::tracking::Report;

/// Worksheet names are limited to 31 characters
const MAX_SHEET_NAME: usize = 31;

fn sheet_name(report: &Report) -> String {
    report.file_stem.chars().take(MAX_SHEET_NAME).collect()
}

/// Write a report as a single-sheet workbook with a bold header row
pub fn write_report_xlsx(report: &Report, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(report))?;

    let header = Format::new().set_bold();
    for (col, name) in report.table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header)?;
    }

    for (row_idx, row) in report.table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            // Empty cells stay empty
            if !value.is_empty() {
                worksheet.write_string(row_num, col as u16, value)?;
            }
        }
    }
    worksheet.autofit();

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Excel file exported to: {}", path.display());
    Ok(())
}
