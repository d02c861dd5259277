//! Typed rows of the PROCESO and DETALLE sheets

use chrono::{NaiveDate, NaiveTime};

use super::identity::{MovementId, Serial};
use super::process::ProcessType;

/// One row of PROCESO: a dated event affecting the units listed under its id
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    /// Zero-based data row in the source sheet
    pub row: usize,
    pub id: Option<MovementId>,
    /// None when the FECHA cell was empty or unparseable
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub process: Option<ProcessType>,
    pub client: Option<String>,
    pub location: Option<String>,
    pub service: Option<String>,
}

/// One row of DETALLE: a unit taking part in a movement
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDetail {
    pub row: usize,
    pub movement_id: Option<MovementId>,
    pub serial: Option<Serial>,
    pub service: Option<String>,
}

impl Movement {
    pub fn is_outbound(&self) -> bool {
        self.process.as_ref().is_some_and(|p| p.is_outbound())
    }

    pub fn is_inbound(&self) -> bool {
        self.process.as_ref().is_some_and(|p| p.is_inbound())
    }

    pub fn id_str(&self) -> &str {
        self.id.as_ref().map(|id| id.as_str()).unwrap_or("")
    }

    pub fn process_label(&self) -> &str {
        self.process.as_ref().map(|p| p.label()).unwrap_or("")
    }
}
