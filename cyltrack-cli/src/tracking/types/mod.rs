//! Typed records for the movement spreadsheet

pub mod calendar;
pub mod identity;
pub mod process;
pub mod record;

pub use calendar::{
    format_report_date, format_report_time, parse_sheet_date, parse_sheet_time, parse_user_date,
};
pub use identity::{MovementId, Serial, normalize_serial};
pub use process::{Direction, ProcessType};
pub use record::{Movement, UnitDetail};
