//! Raw tabular data as fetched from a sheet
//!
//! Every backend produces a `Table`: normalized header names and text cells
//! in source order. Typing (dates, serials, process types) happens later in
//! `tracking::Dataset`.

/// A sheet read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Sheet name the data came from
    pub name: String,
    /// Header names, trimmed and uppercased
    pub columns: Vec<String>,
    /// Data rows; every row has exactly `columns.len()` cells
    pub rows: Vec<Vec<Option<String>>>,
}

/// Canonical form of a header cell
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl Table {
    /// Build a table from raw header and data rows
    ///
    /// Headers are normalized, empty cells become None, short rows are padded,
    /// cells beyond the header width are dropped, and fully blank rows are skipped.
    pub fn from_raw(
        name: impl Into<String>,
        headers: Vec<String>,
        raw_rows: Vec<Vec<String>>,
    ) -> Self {
        let columns: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let width = columns.len();

        let mut rows = Vec::with_capacity(raw_rows.len());
        for raw in raw_rows {
            let mut row: Vec<Option<String>> = raw
                .into_iter()
                .take(width)
                .map(|cell| if cell.trim().is_empty() { None } else { Some(cell) })
                .collect();
            if row.iter().all(|c| c.is_none()) {
                continue;
            }
            row.resize(width, None);
            rows.push(row);
        }

        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Index of a column by (normalized) name; first match wins on duplicates
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.columns.iter().position(|c| *c == wanted)
    }

    /// First column present out of several candidate names
    pub fn first_column_of(&self, names: &[&str]) -> Option<(usize, String)> {
        names
            .iter()
            .find_map(|n| self.column_index(n).map(|i| (i, normalize_header(n))))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
