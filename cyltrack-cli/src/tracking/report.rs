//! Projection of query results into display/export tables
//!
//! Each report has a fixed column list. The same `ReportTable` feeds the
//! terminal renderer, the CSV export and the XLSX export, so column order is
//! identical everywhere.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::queries::{LastLocation, LocationFilter, OverdueOutcome, RangeOutcome, UnitAtClient};
use super::types::{Movement, format_report_date, format_report_time};

/// Column headers shared by the reports
mod headers {
    pub const SERIAL: &str = "SERIE";
    pub const ID: &str = "IDPROC";
    pub const DATE: &str = "FECHA";
    pub const TIME: &str = "HORA";
    pub const PROCESS: &str = "PROCESO";
    pub const CLIENT: &str = "CLIENTE";
    pub const LOCATION: &str = "UBICACION";
    pub const SERVICE: &str = "SERVICIO";
}

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("static regex"));

/// Header row plus text rows; null values are empty strings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    MovementsBySerial,
    UnitsAtClient,
    Overdue,
    LastLocation,
    DateRange,
}

impl ReportKind {
    /// Message shown instead of an empty table
    pub fn not_found_message(&self) -> &'static str {
        match self {
            ReportKind::MovementsBySerial => "No movements found for the given serial.",
            ReportKind::UnitsAtClient => "No units found at the selected client.",
            ReportKind::Overdue => "No units delivered before the cutoff are pending return.",
            ReportKind::LastLocation => "No units match the selected location.",
            ReportKind::DateRange => "No movements found in that date range.",
        }
    }
}

/// A finished report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub table: ReportTable,
    /// Rows excluded from a date filter because their date is unknown
    pub skipped: usize,
    /// Default export file name without extension
    pub file_stem: String,
}

fn opt(value: Option<&str>) -> String {
    value.unwrap_or("").to_string()
}

/// Make a user-supplied value safe to use in a file name
pub fn sanitize_file_stem(raw: &str) -> String {
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(raw.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "report".to_string()
    } else {
        cleaned.to_string()
    }
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn movements_by_serial(serial: &str, movements: &[&Movement]) -> Self {
        use headers::*;
        let mut table = ReportTable::new(&[DATE, TIME, ID, PROCESS, CLIENT, LOCATION]);
        for m in movements {
            table.push(vec![
                format_report_date(m.date),
                format_report_time(m.time),
                m.id_str().to_string(),
                m.process_label().to_string(),
                opt(m.client.as_deref()),
                opt(m.location.as_deref()),
            ]);
        }

        Self {
            kind: ReportKind::MovementsBySerial,
            title: format!("Movements for unit {}", serial.trim()),
            table,
            skipped: 0,
            file_stem: format!("movements_{}", sanitize_file_stem(serial)),
        }
    }

    pub fn units_at_client(client: &str, units: &[UnitAtClient]) -> Self {
        use headers::*;
        let mut table = ReportTable::new(&[SERIAL, ID, DATE]);
        for u in units {
            table.push(vec![
                u.serial.to_string(),
                u.movement_id.clone(),
                format_report_date(u.date),
            ]);
        }

        Self {
            kind: ReportKind::UnitsAtClient,
            title: format!("Units currently at client {}", client.trim()),
            table,
            skipped: 0,
            file_stem: format!("units_at_{}", sanitize_file_stem(client)),
        }
    }

    pub fn overdue(outcome: &OverdueOutcome, days: u32) -> Self {
        use headers::*;
        let mut table = ReportTable::new(&[SERIAL, ID, DATE, PROCESS, CLIENT, SERVICE]);
        for u in &outcome.units {
            table.push(vec![
                u.serial.to_string(),
                u.movement_id.clone(),
                format_report_date(Some(u.delivery_date)),
                u.process.clone(),
                opt(u.client.as_deref()),
                opt(u.service.as_deref()),
            ]);
        }

        Self {
            kind: ReportKind::Overdue,
            title: format!(
                "Units delivered more than {} days ago and not returned (before {})",
                days,
                outcome.cutoff.format("%Y-%m-%d %H:%M")
            ),
            table,
            skipped: outcome.skipped_undated,
            file_stem: "units_not_returned".to_string(),
        }
    }

    pub fn last_location(filter: &LocationFilter, positions: &[LastLocation]) -> Self {
        use headers::*;
        let mut table = ReportTable::new(&[SERIAL, ID, DATE, PROCESS, CLIENT, LOCATION]);
        for p in positions {
            table.push(vec![
                p.serial.to_string(),
                p.movement_id.clone(),
                format_report_date(p.date),
                p.process.clone(),
                opt(p.client.as_deref()),
                opt(p.location.as_deref()),
            ]);
        }

        let (title, file_stem) = match filter {
            LocationFilter::All => (
                "Last movement of every unit".to_string(),
                "last_location_all".to_string(),
            ),
            LocationFilter::Exactly(location) => (
                format!("Last movement of units at location {}", location),
                format!("last_location_{}", sanitize_file_stem(location)),
            ),
        };

        Self {
            kind: ReportKind::LastLocation,
            title,
            table,
            skipped: 0,
            file_stem,
        }
    }

    pub fn date_range(outcome: &RangeOutcome) -> Self {
        use headers::*;
        let mut table = ReportTable::new(&[DATE, ID, PROCESS, CLIENT, LOCATION, SERIAL, SERVICE]);
        for m in &outcome.movements {
            table.push(vec![
                format_report_date(Some(m.date)),
                m.movement_id.clone(),
                m.process.clone(),
                opt(m.client.as_deref()),
                opt(m.location.as_deref()),
                m.serial.as_ref().map(|s| s.to_string()).unwrap_or_default(),
                opt(m.service.as_deref()),
            ]);
        }

        let start = outcome.range.start().format("%Y-%m-%d");
        let end = outcome.range.end().format("%Y-%m-%d");
        Self {
            kind: ReportKind::DateRange,
            title: format!("Movements from {} to {}", start, end),
            table,
            skipped: outcome.skipped_undated,
            file_stem: format!("movements_{}_to_{}", start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::join::fixtures::*;
    use crate::tracking::queries::{DateRange, RangeMovement};
    use crate::tracking::types::Serial;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("HOSPITAL REGIONAL"), "HOSPITAL_REGIONAL");
        assert_eq!(sanitize_file_stem("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_file_stem(" ** "), "report");
        assert_eq!(sanitize_file_stem("000,123"), "000_123");
    }

    #[test]
    fn test_units_at_client_projection() {
        let units = vec![UnitAtClient {
            serial: Serial::parse("1,234").unwrap(),
            movement_id: "77".to_string(),
            date: Some(date(2024, 4, 2)),
        }];

        let report = Report::units_at_client("CLINICA SUR", &units);
        assert_eq!(report.table.columns, vec!["SERIE", "IDPROC", "FECHA"]);
        assert_eq!(report.table.rows, vec![vec!["1234", "77", "2024-04-02"]]);
        assert_eq!(report.file_stem, "units_at_CLINICA_SUR");
        assert_eq!(report.kind, ReportKind::UnitsAtClient);
    }

    #[test]
    fn test_date_range_projection_renders_null_serial_as_blank() {
        let outcome = RangeOutcome {
            range: DateRange::new(date(2024, 1, 1), date(2024, 1, 7)).unwrap(),
            movements: vec![RangeMovement {
                date: date(2024, 1, 3),
                time: None,
                movement_id: "5".to_string(),
                process: "DESPACHO".to_string(),
                client: Some("A".to_string()),
                location: None,
                serial: None,
                service: None,
            }],
            skipped_undated: 2,
        };

        let report = Report::date_range(&outcome);
        assert_eq!(
            report.table.columns,
            vec!["FECHA", "IDPROC", "PROCESO", "CLIENTE", "UBICACION", "SERIE", "SERVICIO"]
        );
        assert_eq!(
            report.table.rows,
            vec![vec!["2024-01-03", "5", "DESPACHO", "A", "", "", ""]]
        );
        assert_eq!(report.skipped, 2);
        assert_eq!(report.file_stem, "movements_2024-01-01_to_2024-01-07");
    }

    #[test]
    fn test_movements_projection_keeps_source_order() {
        let a = make_movement(0, "2", Some(date(2024, 1, 9)), "RETIRO", "A");
        let b = make_movement(1, "1", None, "DESPACHO", "B");

        let report = Report::movements_by_serial("55", &[&a, &b]);
        assert_eq!(report.table.rows[0][2], "2");
        assert_eq!(report.table.rows[1][0], "");
        assert_eq!(report.table.rows[1][4], "B");
    }
}
