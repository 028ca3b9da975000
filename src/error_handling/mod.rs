//! Error handling, categorization, and statistics.
//!
//! This module provides:
//! - Typed errors for initialization and database operations
//! - Error/info categorization for per-run statistics
//! - The shared retry strategy for transient failures

mod categorization;
mod stats;
mod types;

pub use categorization::{categorize_probe_error, get_retry_strategy};
pub use stats::ProcessingStats;
pub use types::{DatabaseError, ErrorType, InfoType, InitializationError};
