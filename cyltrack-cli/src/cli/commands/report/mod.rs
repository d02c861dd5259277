//! Report commands: movements, at-client, overdue, last-location, range

pub mod handler;

pub use handler::handle_report_command;

use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

/// Output options shared by every report
#[derive(Args, Debug, Clone, Default)]
pub struct ReportOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write the formatted output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also save the report under its default file name (in DIR or the configured export dir)
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    /// Export as an Excel workbook instead of CSV
    #[arg(long, requires = "export")]
    pub xlsx: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MovementsArgs {
    /// Unit serial number (commas are ignored)
    pub serial: String,

    #[command(flatten)]
    pub report: ReportOptions,
}

#[derive(Args, Debug, Clone)]
pub struct AtClientArgs {
    /// Client name; pick from a list when omitted
    pub client: Option<String>,

    #[command(flatten)]
    pub report: ReportOptions,
}

#[derive(Args, Debug, Clone)]
pub struct OverdueArgs {
    /// Days after delivery before a unit counts as overdue (default from config)
    #[arg(long)]
    pub days: Option<u32>,

    #[command(flatten)]
    pub report: ReportOptions,
}

#[derive(Args, Debug, Clone)]
pub struct LastLocationArgs {
    /// Only units whose last movement was at this location
    #[arg(short, long)]
    pub location: Option<String>,

    #[command(flatten)]
    pub report: ReportOptions,
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First day, YYYY-MM-DD or DD/MM/YYYY (default: a week before --to)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day, inclusive (default: today)
    #[arg(long)]
    pub to: Option<String>,

    #[command(flatten)]
    pub report: ReportOptions,
}
