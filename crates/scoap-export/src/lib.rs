//! Export adapters: flat CSV tables, JSON record arrays, bounded batch
//! projection and Crossref field analysis.
//!
//! CSV output keeps one leading identifier column and sorts every other
//! column by name. JSON output keeps records in the order given.

mod batch;
mod csv_table;
mod json;
mod summary;

pub mod crossref;
pub mod error;

pub use batch::{BatchOutcome, project_all, scan_all};
pub use csv_table::{CsvRow, CsvTable};
pub use error::{Error, Result};
pub use json::{records_json, write_records_json};
pub use summary::{ArticleSummary, CREATED_AT_FORMAT, summary_table};

#[cfg(test)]
mod tests;
