//! Cylinder lifecycle tracking
//!
//! - `types`: typed movement and unit records
//! - `dataset`: normalization of the raw sheets into records
//! - `join`: the per-unit movement view shared by the queries
//! - `latest`: keep-latest-per-key selection
//! - `queries`: the five reports
//! - `report`: projection of query results into tables

pub mod dataset;
pub mod join;
pub mod latest;
pub mod queries;
pub mod report;
pub mod types;

pub use dataset::{Dataset, LoadDiagnostics};
pub use queries::{QueryError, ReportQuery, distinct_clients, known_locations, run_report};
pub use report::{Report, ReportKind, ReportTable};
