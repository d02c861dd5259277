//! Last known position of every unit

use chrono::NaiveDate;
use serde::Serialize;

use crate::tracking::dataset::Dataset;
use crate::tracking::join::unit_movements;
use crate::tracking::latest::keep_latest;
use crate::tracking::types::Serial;

use super::QueryError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastLocation {
    pub serial: Serial,
    pub movement_id: String,
    pub date: Option<NaiveDate>,
    pub process: String,
    pub client: Option<String>,
    pub location: Option<String>,
}

/// Location filter for the last-location report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationFilter {
    All,
    Exactly(String),
}

impl LocationFilter {
    /// `None` means every location; a blank string is rejected
    pub fn from_input(input: Option<&str>) -> Result<Self, QueryError> {
        match input {
            None => Ok(LocationFilter::All),
            Some(raw) if raw.trim().is_empty() => Err(QueryError::EmptyLocation),
            Some(raw) => Ok(LocationFilter::Exactly(raw.trim().to_string())),
        }
    }

    fn accepts(&self, location: Option<&str>) -> bool {
        match self {
            LocationFilter::All => true,
            LocationFilter::Exactly(wanted) => location.map(str::trim) == Some(wanted.as_str()),
        }
    }
}

/// Every unit's most recent movement (by date), newest first
pub fn latest_positions(dataset: &Dataset) -> Vec<LastLocation> {
    let view = unit_movements(dataset);
    keep_latest(view, |u| u.serial, |u| u.date())
        .into_iter()
        .map(|u| LastLocation {
            serial: u.serial.clone(),
            movement_id: u.movement_id().to_string(),
            date: u.date(),
            process: u.process().to_string(),
            client: u.client().map(str::to_string),
            location: u.location().map(str::to_string),
        })
        .collect()
}

/// Units whose last movement happened at a location (or all of them)
pub fn last_locations(dataset: &Dataset, filter: &LocationFilter) -> Vec<LastLocation> {
    let positions: Vec<LastLocation> = latest_positions(dataset)
        .into_iter()
        .filter(|p| filter.accepts(p.location.as_deref()))
        .collect();

    log::debug!("{} units match location filter {:?}", positions.len(), filter);
    positions
}

/// Distinct locations among the units' last movements, in report order
pub fn known_locations(dataset: &Dataset) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    latest_positions(dataset)
        .into_iter()
        .filter_map(|p| p.location)
        .filter(|l| seen.insert(l.clone()))
        .collect()
}
