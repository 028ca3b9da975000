//! Check resources and state management.
//!
//! This module defines the `CheckResources` struct which holds all initialized
//! resources needed for a bulk e-mail check, plus the shared per-task context.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use hickory_resolver::TokioAsyncResolver;
use tokio::io::Lines;
use tokio::sync::OwnedSemaphorePermit;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::ProcessingStats;
use crate::initialization::RateLimiter;
use crate::smtp::SmtpProbe;
use crate::storage::DbPool;

/// Shared, read-only context handed to every check task.
pub struct ProcessingContext {
    /// DNS resolver for MX and address lookups
    pub resolver: Arc<TokioAsyncResolver>,
    /// SMTP probe (dialogue options and timeouts)
    pub probe: SmtpProbe,
    /// Database connection pool
    pub pool: DbPool,
    /// Error statistics tracker
    pub error_stats: Arc<ProcessingStats>,
    /// Run identifier (format: `run_<timestamp_millis>`)
    pub run_id: Option<String>,
    /// Whether to verify mailboxes over SMTP after the MX lookup
    pub verify: bool,
}

/// All resources initialized for a check run.
///
/// This struct holds ownership of everything needed to execute a bulk check:
/// the database pool, rate limiters, statistics trackers, and counters.
pub struct CheckResources {
    /// Database connection pool
    pub pool: DbPool,

    /// Shared processing context (resolver, probe, stats)
    pub shared_ctx: Arc<ProcessingContext>,

    /// Concurrency semaphore to limit parallel checks
    pub semaphore: Arc<tokio::sync::Semaphore>,
    /// Optional rate limiter for checks per second
    pub request_limiter: Option<Arc<RateLimiter>>,
    /// Shutdown handle for the rate limiter background task
    pub rate_limiter_shutdown: Option<CancellationToken>,

    /// Error statistics tracker
    pub error_stats: Arc<ProcessingStats>,

    /// Count of successfully checked e-mails
    pub completed_emails: Arc<AtomicUsize>,
    /// Count of failed e-mails
    pub failed_emails: Arc<AtomicUsize>,
    /// Count of checks started
    pub total_attempted: Arc<AtomicUsize>,

    /// Unique run identifier
    pub run_id: String,
    /// Start time as Instant for elapsed time calculations
    pub start_time: std::time::Instant,

    /// Original configuration (for reference during finalization)
    pub config: Config,
}

/// Source of e-mail addresses to check.
///
/// Addresses can come from either a file or stdin (`-`).
pub enum EmailSource {
    /// Addresses from a file
    File(Lines<tokio::io::BufReader<tokio::fs::File>>),
    /// Addresses from stdin
    Stdin(Lines<tokio::io::BufReader<tokio::io::Stdin>>),
}

impl EmailSource {
    /// Read the next line from the source.
    ///
    /// Returns `Ok(Some(line))` if a line was read, `Ok(None)` at EOF,
    /// or an error if reading failed.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        match self {
            EmailSource::File(lines) => lines.next_line().await,
            EmailSource::Stdin(lines) => lines.next_line().await,
        }
    }
}

/// All parameters needed to process one e-mail address.
pub struct EmailTaskParams {
    /// The raw input line (already trimmed)
    pub email: Arc<str>,
    /// Shared processing context
    pub ctx: Arc<ProcessingContext>,
    /// Concurrency permit, held until the task completes
    pub permit: OwnedSemaphorePermit,
    /// Optional rate limiter applied before the check starts
    pub request_limiter: Option<Arc<RateLimiter>>,
    /// Per-email timeout
    pub timeout: std::time::Duration,
    /// Counter of successful checks
    pub completed_emails: Arc<AtomicUsize>,
    /// Counter of failed checks
    pub failed_emails: Arc<AtomicUsize>,
}
