//! The five lifecycle reports
//!
//! Every query takes a typed `Dataset`, validates its input before touching
//! the data, and returns typed rows. `run_report` projects them into a
//! `Report` for display and export.

pub mod at_client;
pub mod by_serial;
pub mod date_range;
pub mod last_location;
pub mod overdue;

pub use at_client::{UnitAtClient, units_at_client};
pub use by_serial::movements_for_serial;
pub use date_range::{DateRange, RangeMovement, RangeOutcome, movements_in_range};
pub use last_location::{LastLocation, LocationFilter, known_locations, last_locations};
pub use overdue::{DEFAULT_OVERDUE_DAYS, OverdueOutcome, OverdueUnit, cutoff_from, overdue_units};

use chrono::{NaiveDate, NaiveDateTime};

use super::dataset::Dataset;
use super::report::Report;
use super::types::normalize_serial;

/// Input rejected before running a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    EmptySerial,
    EmptyClient,
    EmptyLocation,
    InvertedRange { start: NaiveDate, end: NaiveDate },
    DaysOutOfRange { days: u32 },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::EmptySerial => write!(f, "Please enter a unit serial number"),
            QueryError::EmptyClient => write!(f, "Please select a client"),
            QueryError::EmptyLocation => {
                write!(f, "Location cannot be blank - omit --location to list all locations")
            }
            QueryError::InvertedRange { start, end } => write!(
                f,
                "Start date {} cannot be after end date {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            QueryError::DaysOutOfRange { days } => {
                write!(f, "{} days reaches past the earliest supported date", days)
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// A report request, fully parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportQuery {
    MovementsBySerial { serial: String },
    UnitsAtClient { client: String },
    Overdue { now: NaiveDateTime, days: u32 },
    LastLocation { location: Option<String> },
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl ReportQuery {
    /// Reject invalid input without touching any data
    pub fn validate(&self) -> Result<(), QueryError> {
        match self {
            ReportQuery::MovementsBySerial { serial } if normalize_serial(serial).is_empty() => {
                Err(QueryError::EmptySerial)
            }
            ReportQuery::UnitsAtClient { client } if client.trim().is_empty() => {
                Err(QueryError::EmptyClient)
            }
            ReportQuery::LastLocation { location } => {
                LocationFilter::from_input(location.as_deref()).map(|_| ())
            }
            ReportQuery::Overdue { now, days } => cutoff_from(*now, *days)
                .map(|_| ())
                .ok_or(QueryError::DaysOutOfRange { days: *days }),
            ReportQuery::DateRange { start, end } => DateRange::new(*start, *end).map(|_| ()),
            _ => Ok(()),
        }
    }
}

/// Validate and run a report query
pub fn run_report(dataset: &Dataset, query: &ReportQuery) -> Result<Report, QueryError> {
    log::debug!("Running report {:?}", query);
    query.validate()?;

    let report = match query {
        ReportQuery::MovementsBySerial { serial } => {
            let movements = movements_for_serial(dataset, serial)?;
            Report::movements_by_serial(serial, &movements)
        }
        ReportQuery::UnitsAtClient { client } => {
            let units = units_at_client(dataset, client)?;
            Report::units_at_client(client, &units)
        }
        ReportQuery::Overdue { now, days } => {
            let cutoff =
                cutoff_from(*now, *days).ok_or(QueryError::DaysOutOfRange { days: *days })?;
            let outcome = overdue_units(dataset, cutoff);
            Report::overdue(&outcome, *days)
        }
        ReportQuery::LastLocation { location } => {
            let filter = LocationFilter::from_input(location.as_deref())?;
            let positions = last_locations(dataset, &filter);
            Report::last_location(&filter, &positions)
        }
        ReportQuery::DateRange { start, end } => {
            let range = DateRange::new(*start, *end)?;
            Report::date_range(&movements_in_range(dataset, range))
        }
    };

    log::info!("{} -> {} rows", report.title, report.table.len());
    Ok(report)
}

/// Distinct client names in PROCESO, in order of first appearance
pub fn distinct_clients(dataset: &Dataset) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    dataset
        .movements
        .iter()
        .filter_map(|m| m.client.as_ref())
        .filter(|c| seen.insert(c.as_str()))
        .cloned()
        .collect()
}
