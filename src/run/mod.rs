//! The bulk check pipeline.
//!
//! This module wires together initialization, the concurrent check loop, and
//! finalization. The main entry point is [`run_check`].

mod finalize;
mod init;
mod resources;
mod task;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::warn;
use tokio_util::sync::CancellationToken;

use crate::app::log_progress;
use crate::config::{Config, LOGGING_INTERVAL};

pub use resources::{CheckResources, EmailSource, EmailTaskParams, ProcessingContext};
pub use task::{process_email, CheckError, ProcessEmailResult};

use finalize::finalize_check;
use init::init_check_resources;
use task::process_email_task;

/// Results of a bulk e-mail check run.
///
/// Contains summary statistics and metadata about the completed run.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Total number of addresses processed
    pub total_emails: usize,
    /// Number of addresses successfully checked
    pub successful: usize,
    /// Number of addresses that failed to check
    pub failed: usize,
    /// Path to the SQLite database containing results
    pub db_path: PathBuf,
    /// Run identifier (format: `run_<timestamp_millis>`)
    pub run_id: String,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Result of the check loop, needed for finalization.
pub struct CheckLoopResult {
    /// Cancellation token for the logging task
    pub cancel: CancellationToken,
    /// Handle to the logging task
    pub logging_task: Option<tokio::task::JoinHandle<()>>,
}

/// Runs a bulk e-mail check with the provided configuration.
///
/// This is the main entry point for the library. It reads addresses from the
/// input file (or stdin), processes them concurrently, and stores results in
/// a SQLite database.
///
/// # Arguments
///
/// * `config` - Configuration for the run (file path, concurrency, timeouts, etc.)
///
/// # Returns
///
/// Returns a `CheckReport` containing summary statistics, or an error if the
/// run failed to complete.
///
/// # Errors
///
/// This function will return an error if:
/// - The input file cannot be opened
/// - Database initialization fails
///
/// # Example
///
/// ```no_run
/// use dnsmx::{run_check, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     file: PathBuf::from("emails.txt"),
///     ..Default::default()
/// };
/// let report = run_check(config).await?;
/// println!("Checked {} addresses", report.total_emails);
/// # Ok(())
/// # }
/// ```
pub async fn run_check(config: Config) -> Result<CheckReport> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let (resources, mut source, _total_lines) = init_check_resources(config).await?;

    // Background progress logging
    let cancel = CancellationToken::new();
    let cancel_logging = cancel.child_token();
    let completed_for_logging = Arc::clone(&resources.completed_emails);
    let failed_for_logging = Arc::clone(&resources.failed_emails);
    let total_for_logging = Arc::clone(&resources.total_attempted);
    let start_time = resources.start_time;
    let logging_task = Some(tokio::task::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL as u64));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(
                        start_time,
                        &completed_for_logging,
                        &failed_for_logging,
                        Some(&total_for_logging),
                    );
                }
                _ = cancel_logging.cancelled() => {
                    break;
                }
            }
        }
    }));

    let mut tasks = FuturesUnordered::new();

    loop {
        let line = match source.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                continue;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let permit = match Arc::clone(&resources.semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping address: {trimmed}");
                continue;
            }
        };

        resources.total_attempted.fetch_add(1, Ordering::SeqCst);

        let params = EmailTaskParams {
            email: Arc::from(trimmed),
            ctx: Arc::clone(&resources.shared_ctx),
            permit,
            request_limiter: resources.request_limiter.as_ref().map(Arc::clone),
            timeout,
            completed_emails: Arc::clone(&resources.completed_emails),
            failed_emails: Arc::clone(&resources.failed_emails),
        };
        tasks.push(tokio::spawn(process_email_task(params)));
    }

    // Drain all in-flight tasks
    while let Some(result) = tasks.next().await {
        if let Err(e) = result {
            warn!("Check task panicked: {e}");
        }
    }

    finalize_check(
        resources,
        CheckLoopResult {
            cancel,
            logging_task,
        },
    )
    .await
}
