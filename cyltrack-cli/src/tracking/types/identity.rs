//! Identity keys: unit serials and movement ids
//!
//! Both arrive as loosely typed spreadsheet cells. They are only comparable
//! after normalization, so the constructors are the single place that happens.

use serde::Serialize;

/// Normalized unit serial number
///
/// Normalization casts to text, removes thousands separators (`,`) and trims
/// surrounding whitespace. Two serials are the same unit iff their normalized
/// forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    /// Normalize raw input. Returns None when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_serial(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Serial(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Serial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical text form of a serial
pub fn normalize_serial(raw: &str) -> String {
    raw.replace(',', "").trim().to_string()
}

/// Movement id (IDPROC / DOCUMENTO), compared as trimmed text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MovementId(String);

impl MovementId {
    /// Returns None for blank keys
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(MovementId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MovementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
