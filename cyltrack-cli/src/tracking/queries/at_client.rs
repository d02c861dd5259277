//! Units currently held by a client

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::tracking::dataset::Dataset;
use crate::tracking::join::{UnitMovement, unit_movements};
use crate::tracking::latest::keep_latest;
use crate::tracking::types::Serial;

use super::QueryError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitAtClient {
    pub serial: Serial,
    pub movement_id: String,
    pub date: Option<NaiveDate>,
}

/// Units whose most recent movement (date, then time) is outbound to `client`
///
/// Rows come back in the order the unit first appears in DETALLE.
pub fn units_at_client(dataset: &Dataset, client: &str) -> Result<Vec<UnitAtClient>, QueryError> {
    let client = client.trim();
    if client.is_empty() {
        return Err(QueryError::EmptyClient);
    }

    let view = unit_movements(dataset);
    let mut first_seen: HashMap<&Serial, usize> = HashMap::new();
    for unit in &view {
        let next = first_seen.len();
        first_seen.entry(unit.serial).or_insert(next);
    }

    let latest = keep_latest(view, |u| u.serial, |u| u.date().map(|d| (d, u.time())));

    let mut held: Vec<&UnitMovement<'_>> = latest
        .iter()
        .filter(|u| u.is_outbound() && u.client().map(str::trim) == Some(client))
        .collect();
    held.sort_by_key(|u| first_seen.get(u.serial).copied());

    log::debug!("{} units currently at client {:?}", held.len(), client);

    Ok(held
        .into_iter()
        .map(|u| UnitAtClient {
            serial: u.serial.clone(),
            movement_id: u.movement_id().to_string(),
            date: u.date(),
        })
        .collect())
}
