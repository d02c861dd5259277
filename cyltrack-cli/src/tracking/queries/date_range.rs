//! Movements within an inclusive date range, with the units they carried

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::tracking::dataset::Dataset;
use crate::tracking::join::details_by_movement;
use crate::tracking::types::Serial;

use super::QueryError;

/// Inclusive, date-only range. Construction rejects `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, QueryError> {
        if start > end {
            return Err(QueryError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// From `days` days before `end` through `end`, both included
    ///
    /// None when the start would fall before the first representable date.
    pub fn last_days(end: NaiveDate, days: u32) -> Option<Self> {
        let start = end.checked_sub_days(Days::new(u64::from(days)))?;
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeMovement {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub movement_id: String,
    pub process: String,
    pub client: Option<String>,
    pub location: Option<String>,
    /// None when the movement has no DETALLE rows
    pub serial: Option<Serial>,
    pub service: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeOutcome {
    pub range: DateRange,
    pub movements: Vec<RangeMovement>,
    /// PROCESO rows left out because their date is unknown
    pub skipped_undated: usize,
}

/// Movements dated inside `range`, one row per unit carried
///
/// Rows follow PROCESO order, then DETALLE order within a movement. A
/// movement without units yields a single row with no serial.
pub fn movements_in_range(dataset: &Dataset, range: DateRange) -> RangeOutcome {
    let details = details_by_movement(&dataset.details);
    let mut movements = Vec::new();
    let mut skipped_undated = 0;

    for movement in &dataset.movements {
        let Some(date) = movement.date else {
            skipped_undated += 1;
            continue;
        };
        if !range.contains(date) {
            continue;
        }

        let base = RangeMovement {
            date,
            time: movement.time,
            movement_id: movement.id_str().to_string(),
            process: movement.process_label().to_string(),
            client: movement.client.clone(),
            location: movement.location.clone(),
            serial: None,
            service: movement.service.clone(),
        };

        let units = movement.id.as_ref().and_then(|id| details.get(id));
        match units {
            Some(units) if !units.is_empty() => {
                for detail in units {
                    movements.push(RangeMovement {
                        serial: detail.serial.clone(),
                        service: detail.service.clone().or_else(|| base.service.clone()),
                        ..base.clone()
                    });
                }
            }
            _ => movements.push(base),
        }
    }

    log::debug!(
        "{} rows between {} and {} ({} undated movements skipped)",
        movements.len(),
        range.start,
        range.end,
        skipped_undated
    );

    RangeOutcome {
        range,
        movements,
        skipped_undated,
    }
}
