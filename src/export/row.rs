//! Row extraction shared by the exporters.

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// One exported `email_status` row.
///
/// `mx_records` stays a raw JSON string in CSV output and is re-parsed into
/// a nested array for JSONL output.
#[derive(Debug, Serialize)]
pub struct ExportRow {
    pub id: i64,
    pub email: String,
    pub domain: String,
    #[serde(skip)]
    pub mx_records: Option<String>,
    pub mx_count: i64,
    pub used_implicit_mx: bool,
    pub verdict: String,
    pub smtp_code: Option<i64>,
    pub smtp_message: Option<String>,
    pub probed_host: Option<String>,
    pub response_time: f64,
    pub timestamp: i64,
    pub run_id: Option<String>,
}

impl ExportRow {
    pub fn from_row(row: &SqliteRow) -> Self {
        ExportRow {
            id: row.get("id"),
            email: row.get("email"),
            domain: row.get("domain"),
            mx_records: row.get("mx_records"),
            mx_count: row.get("mx_count"),
            used_implicit_mx: row.get("used_implicit_mx"),
            verdict: row.get("verdict"),
            smtp_code: row.get("smtp_code"),
            smtp_message: row.get("smtp_message"),
            probed_host: row.get("probed_host"),
            response_time: row.get("response_time"),
            timestamp: row.get("timestamp"),
            run_id: row.get("run_id"),
        }
    }
}
