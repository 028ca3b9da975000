// storage/mod.rs
// Database operations module

pub mod insert;
pub mod migrations;
pub mod models;
pub mod pool;

// Re-export commonly used items
pub use insert::{insert_run_metadata, record_email_failure, record_email_status, update_run_stats};
pub use migrations::run_migrations;
pub use models::{EmailFailureRecord, EmailRecord, RunMetadata, RunStats};
pub use pool::{init_db_pool_with_path, DbPool};
