//! User configuration
//!
//! Read from `<config dir>/cyltrack/config.toml` (or `--config`), then
//! overridden by `CYLTRACK_*` environment variables. Command-line flags are
//! applied last, by the command handlers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::source::{SheetNames, SourceKind};
use crate::tracking::queries::DEFAULT_OVERDUE_DAYS;

pub mod env {
    pub const SOURCE: &str = "CYLTRACK_SOURCE";
    pub const TOKEN: &str = "CYLTRACK_TOKEN";
    pub const EXPORT_DIR: &str = "CYLTRACK_EXPORT_DIR";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub reports: ReportsConfig,
    pub output: OutputConfig,
}

/// Where the two sheets come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Workbook path, CSV directory, spreadsheet id or URL
    pub location: String,
    pub kind: SourceKind,
    pub movement_sheet: String,
    pub detail_sheet: String,
    pub timeout_secs: u64,
    /// Bearer token for private remote sheets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let sheets = SheetNames::default();
        Self {
            location: "TRAZABILIDAD.xlsx".to_string(),
            kind: SourceKind::Auto,
            movement_sheet: sheets.movement,
            detail_sheet: sheets.detail,
            timeout_secs: 30,
            token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub overdue_days: u32,
    pub range_default_days: u32,
    /// IANA zone name used for "now" and "today"
    pub timezone: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            overdue_days: DEFAULT_OVERDUE_DAYS,
            range_default_days: 7,
            timezone: "America/Santiago".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub export_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
        }
    }
}

/// `~/.config/cyltrack/config.toml` on Linux
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cyltrack")
        .join("config.toml")
}

impl Config {
    /// Load the config file and apply environment overrides
    ///
    /// An explicit path must exist; the default path may be missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::debug!("No config file at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `CYLTRACK_*` overrides; blank values are ignored
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(location) = get(env::SOURCE) {
            self.source.location = location;
        }
        if let Some(token) = get(env::TOKEN) {
            self.source.token = Some(token);
        }
        if let Some(dir) = get(env::EXPORT_DIR) {
            self.output.export_dir = PathBuf::from(dir);
        }
    }

    pub fn sheet_names(&self) -> SheetNames {
        SheetNames {
            movement: self.source.movement_sheet.clone(),
            detail: self.source.detail_sheet.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.reports
            .timezone
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown timezone in config: {}", self.reports.timezone))
    }

    /// Current wall-clock time in the configured zone
    pub fn now(&self) -> Result<NaiveDateTime> {
        let tz = self.timezone()?;
        Ok(Utc::now().with_timezone(&tz).naive_local())
    }

    pub fn today(&self) -> Result<NaiveDate> {
        Ok(self.now()?.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            location = "/data/TRAZABILIDAD.ods"
            kind = "workbook"

            [reports]
            overdue_days = 45
            "#,
        )
        .unwrap();

        assert_eq!(config.source.location, "/data/TRAZABILIDAD.ods");
        assert_eq!(config.source.kind, SourceKind::Workbook);
        assert_eq!(config.source.movement_sheet, "PROCESO");
        assert_eq!(config.reports.overdue_days, 45);
        assert_eq!(config.reports.range_default_days, 7);
        assert_eq!(config.output.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (env::SOURCE, "1AbCdEfGhIjKlMnOpQrStUvWxYz0123456789"),
            (env::TOKEN, "  "),
            (env::EXPORT_DIR, "/tmp/reports"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.source.location, "1AbCdEfGhIjKlMnOpQrStUvWxYz0123456789");
        assert_eq!(config.source.token, None);
        assert_eq!(config.output.export_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_timezone() {
        let mut config = Config::default();
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::Santiago);

        config.reports.timezone = "Mars/Olympus".to_string();
        assert!(config.timezone().is_err());
        assert!(config.now().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/no/such/cyltrack.toml"))).is_err());
    }
}
