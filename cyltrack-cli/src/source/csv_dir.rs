//! Directory of CSV exports, one file per sheet (`PROCESO.csv`, `DETALLE.csv`)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;

use super::{LoadError, SheetSource, Table};

#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<sheet>.csv`, matching the file stem case-insensitively
    fn sheet_path(&self, sheet: &str) -> Result<Option<PathBuf>, LoadError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| LoadError::Unreachable {
            origin: self.describe(),
            reason: e.to_string(),
        })?;

        let wanted = sheet.trim().to_uppercase();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            let stem_matches = path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.trim().to_uppercase() == wanted);
            if is_csv && stem_matches {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

/// Decode CSV bytes (first record = headers) into a table
///
/// Shared with the remote backend, which receives the same format.
pub fn decode_csv(sheet: &str, bytes: &[u8]) -> Result<Table, LoadError> {
    let malformed = |e: csv::Error| LoadError::Malformed {
        sheet: sheet.to_string(),
        reason: e.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_raw(sheet, headers, rows))
}

fn read_file(path: &Path, sheet: &str) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Unreachable {
        origin: path.display().to_string(),
        reason: e.to_string(),
    })?;
    decode_csv(sheet, &bytes)
}

#[async_trait]
impl SheetSource for CsvDirectory {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn fetch(&self, sheet: &str) -> Result<Table, LoadError> {
        match self.sheet_path(sheet)? {
            Some(path) => read_file(&path, sheet),
            None => Err(LoadError::MissingSheet {
                sheet: sheet.to_string(),
                origin: self.describe(),
            }),
        }
    }
}
