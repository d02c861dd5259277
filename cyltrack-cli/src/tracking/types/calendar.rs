//! Date and time cells as written in the PROCESO sheet

use chrono::{NaiveDate, NaiveTime};

/// Date format used by the sheet (day/month/year)
pub const SHEET_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date format used in reports and exports
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a FECHA cell. Unparseable values are None, never an error.
pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, SHEET_DATE_FORMAT).ok()
}

/// Parse a HORA cell (HH:MM:SS or HH:MM)
pub fn parse_sheet_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M:%S") {
        return Some(t);
    }
    if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M") {
        return Some(t);
    }

    None
}

/// Parse a date typed by the user on the command line (YYYY-MM-DD or DD/MM/YYYY)
pub fn parse_user_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, REPORT_DATE_FORMAT)
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, SHEET_DATE_FORMAT).ok())
}

pub fn format_report_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(REPORT_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_report_time(time: Option<NaiveTime>) -> String {
    time.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheet_date_day_first() {
        assert_eq!(
            parse_sheet_date("07/01/2024"),
            Some(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap())
        );
        assert_eq!(
            parse_sheet_date(" 1/2/2024 "),
            Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_sheet_date_rejects_other_formats() {
        assert_eq!(parse_sheet_date("2024-01-07"), None);
        assert_eq!(parse_sheet_date("31/02/2024"), None);
        assert_eq!(parse_sheet_date("pendiente"), None);
        assert_eq!(parse_sheet_date(""), None);
    }

    #[test]
    fn test_parse_sheet_time() {
        assert_eq!(parse_sheet_time("14:35"), NaiveTime::from_hms_opt(14, 35, 0));
        assert_eq!(parse_sheet_time("08:05:09"), NaiveTime::from_hms_opt(8, 5, 9));
        assert_eq!(parse_sheet_time("tarde"), None);
    }

    #[test]
    fn test_parse_user_date_accepts_both_orders() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 7);
        assert_eq!(parse_user_date("2024-01-07"), expected);
        assert_eq!(parse_user_date("07/01/2024"), expected);
        assert_eq!(parse_user_date("next week"), None);
    }

    #[test]
    fn test_format_report_date() {
        assert_eq!(
            format_report_date(NaiveDate::from_ymd_opt(2024, 1, 7)),
            "2024-01-07"
        );
        assert_eq!(format_report_date(None), "");
    }
}
