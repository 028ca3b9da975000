//! Export functionality for dnsmx data.
//!
//! This module provides functions to export data from the SQLite database
//! into CSV or JSONL for downstream processing.

mod csv;
mod jsonl;
mod queries;
mod row;
mod types;

pub use csv::export_csv;
pub use jsonl::export_jsonl;
pub use types::{ExportFormat, ExportOptions};
