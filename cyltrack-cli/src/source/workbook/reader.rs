//! Read a single worksheet into a `Table`
//!
//! Cells are rendered as the text a user would see in the sheet: whole
//! numbers without a decimal part (serials and ids are often stored as
//! numbers), date cells as dd/mm/YYYY and time-only cells as HH:MM:SS.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::source::{LoadError, Table};
use crate::tracking::types::calendar::SHEET_DATE_FORMAT;

/// Day zero of the 1900 date system (accounts for the 1900 leap-year bug)
fn excel_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

/// Convert a serial day number to text
///
/// Serials outside the calendar come back as the bare number, which the
/// date parser then rejects.
fn serial_to_text(serial: f64) -> String {
    if !serial.is_finite() || serial < 0.0 {
        return serial.to_string();
    }
    if serial < 1.0 {
        let seconds = (serial * 86_400.0).round() as u32;
        return NaiveTime::from_num_seconds_from_midnight_opt(seconds % 86_400, 0)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
    }
    let millis = (serial * 86_400_000.0).round() as i64;
    Duration::try_milliseconds(millis)
        .and_then(|offset| excel_epoch().checked_add_signed(offset))
        .map(|moment| moment.date().format(SHEET_DATE_FORMAT).to_string())
        .unwrap_or_else(|| serial.to_string())
}

/// ISO dates (ods) to the sheet's day/month/year text; anything else unchanged
fn iso_to_text(raw: &str) -> String {
    let date_part = raw.get(..10).unwrap_or(raw);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format(SHEET_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Convert a worksheet cell to its display text
pub fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers print without ".0"
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => serial_to_text(dt.as_f64()),
        Data::DateTimeIso(s) => iso_to_text(s),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Read one sheet; the first row holds the headers
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Table, LoadError> {
    let origin = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Unreachable {
        origin: origin.clone(),
        reason: e.to_string(),
    })?;

    // Sheet lookup ignores case and surrounding spaces
    let wanted = sheet.trim().to_uppercase();
    let actual = workbook
        .sheet_names()
        .iter()
        .find(|name| name.trim().to_uppercase() == wanted)
        .cloned()
        .ok_or_else(|| LoadError::MissingSheet {
            sheet: sheet.to_string(),
            origin: origin.clone(),
        })?;

    let range = workbook
        .worksheet_range(&actual)
        .map_err(|e| LoadError::Malformed {
            sheet: sheet.to_string(),
            reason: e.to_string(),
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_text).collect(),
        None => Vec::new(),
    };
    let data: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_text).collect())
        .collect();

    log::debug!("Read {} raw rows from {}!{}", data.len(), origin, actual);
    Ok(Table::from_raw(sheet, headers, data))
}
