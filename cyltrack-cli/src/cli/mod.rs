//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::source::SourceKind;
use commands::report::{
    AtClientArgs, LastLocationArgs, MovementsArgs, OverdueArgs, RangeArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "cyltrack",
    version,
    about = "Cylinder movement reports from the PROCESO/DETALLE tracking sheets"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Workbook path, CSV directory, spreadsheet id or URL (overrides config)
    #[arg(long, global = true, value_name = "PATH|URL|ID")]
    pub source: Option<String>,

    /// Force a source backend instead of detecting it
    #[arg(long, global = true, value_enum)]
    pub kind: Option<SourceKind>,

    /// Config file (default: <config dir>/cyltrack/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Every movement of one unit
    Movements(MovementsArgs),
    /// Units whose latest movement delivered them to a client
    AtClient(AtClientArgs),
    /// Units delivered long ago and never returned
    Overdue(OverdueArgs),
    /// Last known movement of every unit
    LastLocation(LastLocationArgs),
    /// Movements between two dates, with the units they carried
    Range(RangeArgs),
    /// List distinct client names
    Clients,
    /// List distinct last-known locations
    Locations,
    /// Load the data source and report what was found
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_parse_report_command_with_globals() {
        let cli = Cli::try_parse_from([
            "cyltrack",
            "range",
            "--from",
            "2024-01-01",
            "--source",
            "data/",
            "-vv",
            "--format",
            "csv",
        ])
        .unwrap();

        assert_eq!(cli.global.source.as_deref(), Some("data/"));
        assert_eq!(cli.global.verbose, 2);
        match cli.command {
            Commands::Range(args) => {
                assert_eq!(args.from.as_deref(), Some("2024-01-01"));
                assert_eq!(args.to, None);
                assert_eq!(args.report.format, OutputFormat::Csv);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_export_flag_with_and_without_dir() {
        let cli = Cli::try_parse_from(["cyltrack", "overdue", "--export"]).unwrap();
        let Commands::Overdue(args) = cli.command else {
            panic!("expected overdue");
        };
        assert_eq!(args.report.export, Some(None));
        assert_eq!(args.days, None);

        let cli =
            Cli::try_parse_from(["cyltrack", "overdue", "--days", "45", "--export", "out"]).unwrap();
        let Commands::Overdue(args) = cli.command else {
            panic!("expected overdue");
        };
        assert_eq!(args.report.export, Some(Some(PathBuf::from("out"))));
        assert_eq!(args.days, Some(45));
    }

    #[test]
    fn test_movements_requires_serial() {
        assert!(Cli::try_parse_from(["cyltrack", "movements"]).is_err());
    }
}
