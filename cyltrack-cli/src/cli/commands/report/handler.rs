//! Report command handler

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::*;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use is_terminal::IsTerminal;
use std::fs;

use super::ReportOptions;
use crate::cli::Commands;
use crate::cli::GlobalArgs;
use crate::cli::commands::{load_from_config, resolve_config};
use crate::config::Config;
use crate::export::{ExportFormat, export_report};
use crate::output::format_report;
use crate::tracking::types::parse_user_date;
use crate::tracking::queries::DateRange;
use crate::tracking::{Dataset, Report, ReportQuery, distinct_clients, run_report};

/// How many near matches to offer for an unknown client
const MAX_SUGGESTIONS: usize = 5;

/// Load the data, run one report and write it out
pub async fn handle_report_command(global: &GlobalArgs, command: Commands) -> Result<()> {
    let config = resolve_config(global)?;

    let (query, options) = match &command {
        Commands::Range(args) => {
            let today = config.today()?;
            let (start, end) = resolve_range(
                args.from.as_deref(),
                args.to.as_deref(),
                today,
                config.reports.range_default_days,
            )?;
            (Some(ReportQuery::DateRange { start, end }), args.report.clone())
        }
        Commands::Overdue(args) => {
            let query = ReportQuery::Overdue {
                now: config.now()?,
                days: args.days.unwrap_or(config.reports.overdue_days),
            };
            (Some(query), args.report.clone())
        }
        Commands::Movements(args) => (
            Some(ReportQuery::MovementsBySerial {
                serial: args.serial.clone(),
            }),
            args.report.clone(),
        ),
        Commands::LastLocation(args) => (
            Some(ReportQuery::LastLocation {
                location: args.location.clone(),
            }),
            args.report.clone(),
        ),
        // Needs the loaded client list when no client was given
        Commands::AtClient(args) => (
            args.client.clone().map(|client| ReportQuery::UnitsAtClient { client }),
            args.report.clone(),
        ),
        other => anyhow::bail!("Not a report command: {:?}", other),
    };

    if let Some(query) = &query {
        query.validate()?;
    }

    let dataset = load_from_config(&config).await?;

    let query = match query {
        Some(query) => query,
        None => ReportQuery::UnitsAtClient {
            client: pick_client(&dataset)?,
        },
    };

    let report = run_report(&dataset, &query)?;

    if report.is_empty() {
        if let ReportQuery::UnitsAtClient { client } = &query {
            suggest_clients(&dataset, client);
        }
    }

    write_report(&report, &options, &config)
}

/// Turn the optional --from/--to arguments into a concrete range
///
/// Missing `to` means today; missing `from` means `default_days` before `to`.
/// Ordering is checked later by the query.
pub fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
    today: NaiveDate,
    default_days: u32,
) -> Result<(NaiveDate, NaiveDate)> {
    let end = match to {
        Some(raw) => parse_date_arg("--to", raw)?,
        None => today,
    };
    let start = match from {
        Some(raw) => parse_date_arg("--from", raw)?,
        None => DateRange::last_days(end, default_days)
            .map(|range| range.start())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "range_default_days = {} reaches past the earliest supported date",
                    default_days
                )
            })?,
    };
    Ok((start, end))
}

fn parse_date_arg(flag: &str, raw: &str) -> Result<NaiveDate> {
    parse_user_date(raw).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid date for {}: '{}' (expected YYYY-MM-DD or DD/MM/YYYY)",
            flag,
            raw.trim()
        )
    })
}

/// Interactive client picker; requires a terminal
fn pick_client(dataset: &Dataset) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!("Please select a client: pass it as an argument (see `cyltrack clients`)");
    }

    let clients = distinct_clients(dataset);
    if clients.is_empty() {
        anyhow::bail!("The movement sheet lists no clients");
    }

    let index = dialoguer::Select::new()
        .with_prompt("Client")
        .items(&clients)
        .default(0)
        .interact()
        .context("Client selection cancelled")?;

    Ok(clients[index].clone())
}

/// Known client names closest to what was typed, best first
pub fn client_suggestions(clients: &[String], input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() || clients.iter().any(|c| c.as_str() == input) {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(&String, i64)> = clients
        .iter()
        .filter_map(|c| matcher.fuzzy_match(c, input).map(|score| (c, score)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(c, _)| c.clone())
        .collect()
}

fn suggest_clients(dataset: &Dataset, client: &str) {
    let suggestions = client_suggestions(&distinct_clients(dataset), client);
    if suggestions.is_empty() {
        return;
    }
    eprintln!("{}", "Client not found. Did you mean:".yellow());
    for name in suggestions {
        eprintln!("  {}", name.cyan());
    }
}

fn write_report(report: &Report, options: &ReportOptions, config: &Config) -> Result<()> {
    let formatted = format_report(report, options.format)?;

    if let Some(path) = &options.output {
        fs::write(path, &formatted)
            .with_context(|| format!("Failed to write output to: {}", path.display()))?;
        eprintln!(
            "Results saved to: {}",
            path.display().to_string().bright_green()
        );
    } else {
        print!("{}", formatted);
    }

    if let Some(dir) = &options.export {
        if report.is_empty() {
            eprintln!("{}", "Nothing to export.".yellow());
            return Ok(());
        }
        let dir = dir.clone().unwrap_or_else(|| config.output.export_dir.clone());
        let format = if options.xlsx {
            ExportFormat::Xlsx
        } else {
            ExportFormat::Csv
        };
        let path = export_report(report, &dir, format)?;
        eprintln!("Exported to: {}", path.display().to_string().bright_green());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_range_defaults_to_last_week() {
        let (start, end) = resolve_range(None, None, date(2024, 1, 8), 7).unwrap();
        assert_eq!(start, date(2024, 1, 1));
        assert_eq!(end, date(2024, 1, 8));
    }

    #[test]
    fn test_resolve_range_accepts_both_date_styles() {
        let (start, end) =
            resolve_range(Some("01/01/2024"), Some("2024-01-07"), date(2030, 1, 1), 7).unwrap();
        assert_eq!(start, date(2024, 1, 1));
        assert_eq!(end, date(2024, 1, 7));

        let (start, _) = resolve_range(None, Some("2024-01-07"), date(2030, 1, 1), 3).unwrap();
        assert_eq!(start, date(2024, 1, 4));
    }

    #[test]
    fn test_resolve_range_rejects_bad_dates() {
        let err = resolve_range(Some("ayer"), None, date(2024, 1, 8), 7).unwrap_err();
        assert!(err.to_string().contains("--from"));
    }

    #[test]
    fn test_resolve_range_rejects_oversized_default() {
        let err = resolve_range(None, None, date(2024, 1, 8), u32::MAX).unwrap_err();
        assert!(err.to_string().contains("range_default_days"));

        // An explicit --from never touches the default
        let (start, _) = resolve_range(Some("2024-01-01"), None, date(2024, 1, 8), u32::MAX).unwrap();
        assert_eq!(start, date(2024, 1, 1));
    }

    #[test]
    fn test_client_suggestions() {
        let clients: Vec<String> = ["HOSPITAL REGIONAL", "CLINICA SUR", "HOSPITAL NORTE"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let suggestions = client_suggestions(&clients, "hospital");
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions.iter().all(|s| s.starts_with("HOSPITAL")));

        assert!(client_suggestions(&clients, "CLINICA SUR").is_empty());
        assert!(client_suggestions(&clients, "zzz").is_empty());
    }
}
