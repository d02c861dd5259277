//! Listing and load-check handlers

use anyhow::Result;
use colored::*;

use super::InspectTarget;
use crate::cli::GlobalArgs;
use crate::cli::commands::{load_from_config, resolve_config};
use crate::output::format_diagnostics;
use crate::tracking::{distinct_clients, known_locations};

pub async fn handle_inspect_command(global: &GlobalArgs, target: InspectTarget) -> Result<()> {
    let config = resolve_config(global)?;
    let dataset = load_from_config(&config).await?;

    let values = match target {
        InspectTarget::Check => {
            print!("{}", format_diagnostics(&dataset.diagnostics));
            return Ok(());
        }
        InspectTarget::Clients => distinct_clients(&dataset),
        InspectTarget::Locations => known_locations(&dataset),
    };

    if values.is_empty() {
        println!("{}", "Nothing found.".yellow());
        return Ok(());
    }
    for value in &values {
        println!("{}", value);
    }
    log::info!("Listed {} {:?}", values.len(), target);
    Ok(())
}
