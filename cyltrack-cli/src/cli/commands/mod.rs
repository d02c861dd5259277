//! Command handlers

pub mod inspect;
pub mod report;

use anyhow::{Context, Result};

use super::GlobalArgs;
use crate::config::Config;
use crate::source::{SourceSession, load_dataset, open_source};
use crate::tracking::Dataset;

/// Config with command-line overrides applied
pub fn resolve_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(global.config.as_deref())?;
    if let Some(source) = &global.source {
        config.source.location = source.clone();
    }
    if let Some(kind) = global.kind {
        config.source.kind = kind;
    }
    Ok(config)
}

/// Open the configured source and load both sheets
pub async fn load_from_config(config: &Config) -> Result<Dataset> {
    let session = SourceSession::new(config.timeout(), config.source.token.clone())?;
    let source = open_source(&config.source.location, config.source.kind, session)?;

    let dataset = load_dataset(source.as_ref(), &config.sheet_names())
        .await
        .with_context(|| format!("Failed to load data from {}", source.describe()))?;

    let diagnostics = &dataset.diagnostics;
    if diagnostics.undated_movements > 0 {
        log::warn!(
            "{} movements have a missing or invalid FECHA and are excluded from date filters",
            diagnostics.undated_movements
        );
    }
    Ok(dataset)
}
