//! Typed dataset built from the two raw sheets
//!
//! This is where loose spreadsheet cells become `Movement` / `UnitDetail`
//! records. Malformed cells never drop a row: they become None and are
//! counted in `LoadDiagnostics`.

use std::collections::HashSet;

use serde::Serialize;

use crate::source::{LoadError, Table};

use super::types::{
    Movement, MovementId, ProcessType, Serial, UnitDetail, parse_sheet_date, parse_sheet_time,
};

/// Column names, as they appear after header normalization
pub mod columns {
    /// Movement key; IDPROC wins when both are present
    pub const KEY_CANDIDATES: &[&str] = &["IDPROC", "DOCUMENTO"];
    pub const DATE: &str = "FECHA";
    pub const TIME: &str = "HORA";
    pub const PROCESS: &str = "PROCESO";
    pub const CLIENT: &str = "CLIENTE";
    pub const LOCATION: &str = "UBICACION";
    pub const SERVICE: &str = "SERVICIO";
    pub const SERIAL: &str = "SERIE";
}

/// How many raw values of unparseable dates to keep for display
const UNDATED_SAMPLE_LIMIT: usize = 5;

/// Counters describing what normalization had to tolerate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadDiagnostics {
    pub movement_rows: usize,
    pub detail_rows: usize,
    /// Key column used for PROCESO (IDPROC or DOCUMENTO)
    pub movement_key: String,
    /// Key column used for DETALLE
    pub detail_key: String,
    /// Movements whose FECHA is empty or unparseable
    pub undated_movements: usize,
    /// A few of the offending raw values, "row N: value"
    pub undated_samples: Vec<String>,
    pub movements_without_id: usize,
    pub details_without_serial: usize,
    /// Details whose movement id matches no PROCESO row
    pub orphan_details: usize,
    /// Movements whose process label is not one of the known types
    pub unknown_processes: usize,
}

/// Both sheets, typed
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub movements: Vec<Movement>,
    pub details: Vec<UnitDetail>,
    pub diagnostics: LoadDiagnostics,
}

impl Dataset {
    /// Normalize the raw PROCESO and DETALLE tables into a dataset
    pub fn from_tables(proceso: &Table, detalle: &Table) -> Result<Self, LoadError> {
        let mut diagnostics = LoadDiagnostics::default();

        let movements = read_movements(proceso, &mut diagnostics)?;
        let details = read_details(detalle, &mut diagnostics)?;

        let known_ids: HashSet<&MovementId> =
            movements.iter().filter_map(|m| m.id.as_ref()).collect();
        diagnostics.orphan_details = details
            .iter()
            .filter(|d| d.movement_id.as_ref().is_some_and(|id| !known_ids.contains(id)))
            .count();

        log::info!(
            "Normalized {} movements and {} unit details ({} undated, {} orphan details)",
            movements.len(),
            details.len(),
            diagnostics.undated_movements,
            diagnostics.orphan_details
        );

        Ok(Self {
            movements,
            details,
            diagnostics,
        })
    }

    /// Build directly from typed records (row indices are taken as given)
    pub fn from_records(movements: Vec<Movement>, details: Vec<UnitDetail>) -> Self {
        let diagnostics = LoadDiagnostics {
            movement_rows: movements.len(),
            detail_rows: details.len(),
            undated_movements: movements.iter().filter(|m| m.date.is_none()).count(),
            ..Default::default()
        };
        Self {
            movements,
            details,
            diagnostics,
        }
    }
}

fn require_column(table: &Table, column: &str) -> Result<usize, LoadError> {
    table
        .column_index(column)
        .ok_or_else(|| LoadError::MissingColumn {
            sheet: table.name.clone(),
            column: column.to_string(),
        })
}

fn require_key(table: &Table) -> Result<(usize, String), LoadError> {
    table
        .first_column_of(columns::KEY_CANDIDATES)
        .ok_or_else(|| LoadError::MissingColumn {
            sheet: table.name.clone(),
            column: columns::KEY_CANDIDATES.join(" or "),
        })
}

fn text(table: &Table, row: usize, col: Option<usize>) -> Option<String> {
    col.and_then(|c| table.cell(row, c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn read_movements(
    table: &Table,
    diagnostics: &mut LoadDiagnostics,
) -> Result<Vec<Movement>, LoadError> {
    let (key_col, key_name) = require_key(table)?;
    let date_col = require_column(table, columns::DATE)?;
    let process_col = require_column(table, columns::PROCESS)?;
    let time_col = table.column_index(columns::TIME);
    let client_col = table.column_index(columns::CLIENT);
    let location_col = table.column_index(columns::LOCATION);
    let service_col = table.column_index(columns::SERVICE);

    diagnostics.movement_key = key_name;
    diagnostics.movement_rows = table.len();

    let mut movements = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let id = table.cell(row, key_col).and_then(MovementId::parse);
        if id.is_none() {
            diagnostics.movements_without_id += 1;
        }

        let raw_date = table.cell(row, date_col).unwrap_or("");
        let date = parse_sheet_date(raw_date);
        if date.is_none() {
            diagnostics.undated_movements += 1;
            if diagnostics.undated_samples.len() < UNDATED_SAMPLE_LIMIT {
                diagnostics
                    .undated_samples
                    .push(format!("row {}: {:?}", row + 2, raw_date));
            }
            log::debug!(
                "{} row {} has unparseable date {:?}",
                table.name,
                row + 2,
                raw_date
            );
        }

        let process = table.cell(row, process_col).and_then(ProcessType::parse);
        if matches!(process, Some(ProcessType::Other(_))) {
            diagnostics.unknown_processes += 1;
        }

        movements.push(Movement {
            row,
            id,
            date,
            time: time_col
                .and_then(|c| table.cell(row, c))
                .and_then(parse_sheet_time),
            process,
            client: text(table, row, client_col),
            location: text(table, row, location_col),
            service: text(table, row, service_col),
        });
    }

    Ok(movements)
}

fn read_details(
    table: &Table,
    diagnostics: &mut LoadDiagnostics,
) -> Result<Vec<UnitDetail>, LoadError> {
    let (key_col, key_name) = require_key(table)?;
    let serial_col = require_column(table, columns::SERIAL)?;
    let service_col = table.column_index(columns::SERVICE);

    diagnostics.detail_key = key_name;
    diagnostics.detail_rows = table.len();

    let mut details = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let serial = table.cell(row, serial_col).and_then(Serial::parse);
        if serial.is_none() {
            diagnostics.details_without_serial += 1;
        }

        details.push(UnitDetail {
            row,
            movement_id: table.cell(row, key_col).and_then(MovementId::parse),
            serial,
            service: text(table, row, service_col),
        });
    }

    Ok(details)
}
