//! Units out of rotation: delivered before the cutoff and never brought back
//!
//! A unit is overdue when its latest outbound movement dated strictly before
//! the cutoff (the delivery candidate) has not been superseded by an inbound
//! movement dated strictly after it.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::tracking::dataset::Dataset;
use crate::tracking::join::{UnitMovement, unit_movements};
use crate::tracking::latest::keep_latest;
use crate::tracking::types::Serial;

/// Default number of days after which an undelivered unit counts as overdue
pub const DEFAULT_OVERDUE_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueUnit {
    pub serial: Serial,
    pub movement_id: String,
    pub delivery_date: NaiveDate,
    pub process: String,
    pub client: Option<String>,
    pub service: Option<String>,
}

/// Result of the overdue query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueOutcome {
    pub cutoff: NaiveDateTime,
    pub units: Vec<OverdueUnit>,
    /// Outbound rows left out because their date is unknown
    pub skipped_undated: usize,
}

/// `now - days`, or None when that falls before the first representable date
pub fn cutoff_from(now: NaiveDateTime, days: u32) -> Option<NaiveDateTime> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
}

/// Units delivered before `cutoff` with no later return
///
/// Output is ordered by delivery date, newest first.
pub fn overdue_units(dataset: &Dataset, cutoff: NaiveDateTime) -> OverdueOutcome {
    let view = unit_movements(dataset);

    let skipped_undated = view
        .iter()
        .filter(|u| u.is_outbound() && u.date().is_none())
        .count();

    let delivered: Vec<UnitMovement<'_>> = view
        .iter()
        .filter(|u| u.is_outbound())
        .filter(|u| u.date().is_some_and(|d| d.and_time(NaiveTime::MIN) < cutoff))
        .copied()
        .collect();
    let candidates = keep_latest(delivered, |u| u.serial, |u| u.date());

    let returns: Vec<UnitMovement<'_>> = view.iter().filter(|u| u.is_inbound()).copied().collect();
    let last_return: HashMap<&Serial, Option<NaiveDate>> = keep_latest(returns, |u| u.serial, |u| u.date())
        .into_iter()
        .map(|u| (u.serial, u.date()))
        .collect();

    let units: Vec<OverdueUnit> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let delivery_date = candidate.date()?;
            let returned = match last_return.get(candidate.serial) {
                Some(Some(return_date)) => *return_date > delivery_date,
                Some(None) | None => false,
            };
            if returned {
                return None;
            }
            Some(OverdueUnit {
                serial: candidate.serial.clone(),
                movement_id: candidate.movement_id().to_string(),
                delivery_date,
                process: candidate.process().to_string(),
                client: candidate.client().map(str::to_string),
                service: candidate.service().map(str::to_string),
            })
        })
        .collect();

    log::debug!(
        "Overdue before {}: {} units ({} undated outbound rows skipped)",
        cutoff,
        units.len(),
        skipped_undated
    );

    OverdueOutcome {
        cutoff,
        units,
        skipped_undated,
    }
}
