//! Local workbook backend (xlsx, xls, ods)

mod reader;

pub use reader::{cell_to_text, read_sheet};

use std::path::PathBuf;

use async_trait::async_trait;

use super::{LoadError, SheetSource, Table};

/// A workbook on disk; reopened for every sheet
#[derive(Debug, Clone)]
pub struct WorkbookFile {
    path: PathBuf,
}

impl WorkbookFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SheetSource for WorkbookFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self, sheet: &str) -> Result<Table, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::Unreachable {
                origin: self.describe(),
                reason: "file does not exist".to_string(),
            });
        }
        read_sheet(&self.path, sheet)
    }
}
