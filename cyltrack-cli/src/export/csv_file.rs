//! CSV encoding of report tables

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer};

use crate::tracking::ReportTable;

/// Encode a table as UTF-8 CSV: header row, then one line per row
pub fn export_csv(table: &ReportTable) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());

    wtr.write_record(&table.columns)
        .context("Failed to write CSV header")?;
    for (i, row) in table.rows.iter().enumerate() {
        wtr.write_record(row)
            .with_context(|| format!("Failed to write CSV row {}", i + 1))?;
    }

    wtr.into_inner().context("Failed to flush CSV writer")
}

/// Decode CSV produced by `export_csv`
pub fn parse_csv(bytes: &[u8]) -> Result<ReportTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let columns: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", i + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(ReportTable { columns, rows })
}
