// storage/models.rs
// Database models and types

/// Represents a completed e-mail check for database insertion.
///
/// Contains everything learned about one address: the MX records found, the
/// verification verdict, and the SMTP reply behind it.
///
/// # Database Schema
///
/// This struct maps directly to the `email_status` table. The `timestamp`
/// field is stored as milliseconds since Unix epoch; `mx_records` holds the
/// JSON-serialized list of `{preference, exchange}` objects, sorted by
/// preference.
pub struct EmailRecord {
    pub email: String,
    pub domain: String,
    pub mx_records: Option<String>,
    pub mx_count: u32,
    pub used_implicit_mx: bool,
    /// Stable verdict label: `deliverable`, `rejected`, `unverifiable`,
    /// `mx-found` (lookup only), or `no-mail-servers`.
    pub verdict: String,
    pub smtp_code: Option<u16>,
    pub smtp_message: Option<String>,
    pub probed_host: Option<String>,
    pub response_time: f64,
    pub timestamp: i64,
    pub run_id: Option<String>,
}

/// Represents a failed e-mail check for the `email_failures` table.
pub struct EmailFailureRecord {
    pub email: String,
    /// The parsed domain, when parsing got that far.
    pub domain: Option<String>,
    pub error_type: String,
    pub error_message: String,
    pub retry_count: u32,
    pub elapsed_time: f64,
    pub timestamp: i64,
    pub run_id: Option<String>,
}

/// Metadata inserted when a run starts.
pub struct RunMetadata<'a> {
    pub run_id: &'a str,
    pub start_time_ms: i64,
    pub version: &'a str,
}

/// Final statistics written when a run completes.
pub struct RunStats<'a> {
    pub run_id: &'a str,
    pub total_emails: i32,
    pub successful_emails: i32,
    pub failed_emails: i32,
    pub elapsed_seconds: f64,
}
