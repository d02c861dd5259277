mod cli;
mod config;
mod export;
mod output;
mod source;
mod tracking;

use anyhow::Result;
use clap::Parser;
use colored::*;

use cli::commands::inspect::{InspectTarget, handle_inspect_command};
use cli::commands::report::handle_report_command;
use cli::{Cli, Commands};

/// `-v` count to a default log filter; `RUST_LOG` still wins
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Clients => handle_inspect_command(&cli.global, InspectTarget::Clients).await,
        Commands::Locations => handle_inspect_command(&cli.global, InspectTarget::Locations).await,
        Commands::Check => handle_inspect_command(&cli.global, InspectTarget::Check).await,
        report => handle_report_command(&cli.global, report).await,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.global.verbose)),
    )
    .format_timestamp(None)
    .init();

    output::configure_colors(cli.global.no_color);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
