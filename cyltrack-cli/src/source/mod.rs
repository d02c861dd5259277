//! Sheet loading
//!
//! A `SheetSource` turns a sheet name into a raw `Table`. Three backends
//! exist: a local workbook (xlsx/ods), a directory of CSV files, and a
//! published spreadsheet fetched over HTTP. `load_dataset` fetches the two
//! sheets one after the other and hands them to `Dataset::from_tables`.

pub mod csv_dir;
pub mod remote;
pub mod table;
pub mod workbook;

pub use csv_dir::CsvDirectory;
pub use remote::{RemoteSpreadsheet, SourceSession, spreadsheet_id};
pub use table::{Table, normalize_header};
pub use workbook::WorkbookFile;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tracking::Dataset;

/// Why a sheet could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Network failure, timeout or missing local file
    Unreachable { origin: String, reason: String },
    /// The source refused the credentials (or served a login page)
    Unauthorized { origin: String, reason: String },
    MissingSheet { sheet: String, origin: String },
    MissingColumn { sheet: String, column: String },
    /// The sheet exists but its contents could not be decoded
    Malformed { sheet: String, reason: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Unreachable { origin, reason } => {
                write!(f, "Could not reach data source '{}': {}", origin, reason)
            }
            LoadError::Unauthorized { origin, reason } => write!(
                f,
                "Access to '{}' was denied ({}). Check that the sheet is shared or set CYLTRACK_TOKEN",
                origin, reason
            ),
            LoadError::MissingSheet { sheet, origin } => {
                write!(f, "Sheet '{}' not found in '{}'", sheet, origin)
            }
            LoadError::MissingColumn { sheet, column } => {
                write!(f, "Sheet '{}' has no column '{}'", sheet, column)
            }
            LoadError::Malformed { sheet, reason } => {
                write!(f, "Sheet '{}' could not be read: {}", sheet, reason)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Anything that can produce a sheet by name
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Human-readable origin, used in messages
    fn describe(&self) -> String;

    async fn fetch(&self, sheet: &str) -> Result<Table, LoadError>;
}

/// Which backend to use for a location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Decide from the location itself
    #[default]
    Auto,
    Workbook,
    Csv,
    Remote,
}

/// Names of the two sheets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetNames {
    pub movement: String,
    pub detail: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            movement: "PROCESO".to_string(),
            detail: "DETALLE".to_string(),
        }
    }
}

/// Resolve `Auto` against the location
pub fn detect_kind(location: &str) -> Option<SourceKind> {
    let path = Path::new(location);
    if path.is_dir() {
        return Some(SourceKind::Csv);
    }
    if path.is_file() {
        return Some(SourceKind::Workbook);
    }
    if spreadsheet_id(location).is_some() {
        return Some(SourceKind::Remote);
    }
    None
}

/// Build the backend for a location
///
/// The session is only consumed by the remote backend.
pub fn open_source(
    location: &str,
    kind: SourceKind,
    session: SourceSession,
) -> Result<Box<dyn SheetSource>, LoadError> {
    let kind = match kind {
        SourceKind::Auto => detect_kind(location).ok_or_else(|| LoadError::Unreachable {
            origin: location.to_string(),
            reason: "not a file, a directory or a spreadsheet id".to_string(),
        })?,
        other => other,
    };
    log::debug!("Opening {:?} source at {}", kind, location);

    match kind {
        SourceKind::Workbook => Ok(Box::new(WorkbookFile::new(location))),
        SourceKind::Csv => Ok(Box::new(CsvDirectory::new(location))),
        SourceKind::Remote => {
            let id = spreadsheet_id(location).ok_or_else(|| LoadError::Unreachable {
                origin: location.to_string(),
                reason: "no spreadsheet id found in location".to_string(),
            })?;
            Ok(Box::new(RemoteSpreadsheet::new(id, session)))
        }
        SourceKind::Auto => unreachable!("resolved above"),
    }
}

/// Fetch one sheet, logging what came back
pub async fn load_table(source: &dyn SheetSource, sheet: &str) -> Result<Table, LoadError> {
    log::info!("Fetching sheet {} from {}", sheet, source.describe());
    let table = source.fetch(sheet).await?;
    log::info!(
        "Sheet {}: {} rows, {} columns",
        sheet,
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

/// Fetch both sheets (sequentially) and normalize them
pub async fn load_dataset(
    source: &dyn SheetSource,
    sheets: &SheetNames,
) -> Result<Dataset, LoadError> {
    let movements = load_table(source, &sheets.movement).await?;
    let details = load_table(source, &sheets.detail).await?;
    Dataset::from_tables(&movements, &details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory source for loader tests
    struct FixedSource {
        tables: HashMap<String, Table>,
    }

    #[async_trait]
    impl SheetSource for FixedSource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        async fn fetch(&self, sheet: &str) -> Result<Table, LoadError> {
            self.tables
                .get(sheet)
                .cloned()
                .ok_or_else(|| LoadError::MissingSheet {
                    sheet: sheet.to_string(),
                    origin: self.describe(),
                })
        }
    }

    fn s(v: &str) -> String {
        v.to_string()
    }

    fn make_source(with_detail: bool) -> FixedSource {
        let mut tables = HashMap::new();
        tables.insert(
            s("PROCESO"),
            Table::from_raw(
                "PROCESO",
                vec![s("idproc"), s(" Fecha "), s("PROCESO"), s("CLIENTE")],
                vec![vec![s("1"), s("05/01/2024"), s("DESPACHO"), s("ACME")]],
            ),
        );
        if with_detail {
            tables.insert(
                s("DETALLE"),
                Table::from_raw(
                    "DETALLE",
                    vec![s("IDPROC"), s("SERIE")],
                    vec![vec![s("1"), s("000,123")]],
                ),
            );
        }
        FixedSource { tables }
    }

    #[tokio::test]
    async fn test_load_dataset_from_source() {
        let dataset = load_dataset(&make_source(true), &SheetNames::default())
            .await
            .unwrap();
        assert_eq!(dataset.movements.len(), 1);
        assert_eq!(dataset.details[0].serial.as_ref().unwrap().as_str(), "000123");
    }

    #[tokio::test]
    async fn test_missing_sheet_is_reported() {
        let err = load_dataset(&make_source(false), &SheetNames::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingSheet {
                sheet: s("DETALLE"),
                origin: s("memory")
            }
        );
    }

    #[test]
    fn test_detect_kind() {
        let dir = std::env::temp_dir();
        assert_eq!(detect_kind(dir.to_str().unwrap()), Some(SourceKind::Csv));
        assert_eq!(
            detect_kind("https://docs.google.com/spreadsheets/d/1AbCdEfGhIjKlMnOpQrStUvWxYz0123456789/edit"),
            Some(SourceKind::Remote)
        );
        assert_eq!(detect_kind("no/such/file.xlsx"), None);
    }

    #[test]
    fn test_error_messages_name_the_sheet() {
        let err = LoadError::MissingColumn {
            sheet: s("DETALLE"),
            column: s("SERIE"),
        };
        assert_eq!(err.to_string(), "Sheet 'DETALLE' has no column 'SERIE'");
    }
}
