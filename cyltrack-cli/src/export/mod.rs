//! Report export to files

mod csv_file;
mod xlsx_file;

pub use csv_file::{export_csv, parse_csv};
pub use xlsx_file::write_report_xlsx;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::tracking::Report;

/// File format for `--export`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// `<dir>/<file stem>.<ext>`
pub fn export_path(dir: &Path, report: &Report, format: ExportFormat) -> PathBuf {
    dir.join(format!("{}.{}", report.file_stem, format.extension()))
}

/// Write a report into `dir` under its default file name
pub fn export_report(report: &Report, dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = export_path(dir, report, format);

    match format {
        ExportFormat::Csv => {
            let bytes = export_csv(&report.table)?;
            std::fs::write(&path, bytes)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
            log::info!("CSV file exported to: {}", path.display());
        }
        ExportFormat::Xlsx => write_report_xlsx(report, &path)?,
    }

    Ok(path)
}
