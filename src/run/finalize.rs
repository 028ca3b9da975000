//! Check finalization and cleanup.
//!
//! This module contains the `finalize_check` function which handles
//! all cleanup and result aggregation after the main check loop completes.

use std::sync::atomic::Ordering;

use anyhow::{Context, Result};

use crate::app::{log_progress, print_error_statistics, shutdown_gracefully};
use crate::storage::{update_run_stats, RunStats};

use super::resources::CheckResources;
use super::{CheckLoopResult, CheckReport};

/// Finalize a check run and produce the final report.
///
/// This function performs the following finalization steps:
/// 1. Shut down logging and rate limiter tasks
/// 2. Log final progress
/// 3. Update run statistics in the database
/// 4. Checkpoint the WAL file
/// 5. Close the database pool
/// 6. Print error statistics
/// 7. Construct and return the check report
///
/// # Errors
///
/// Returns an error if database operations fail.
pub async fn finalize_check(
    resources: CheckResources,
    loop_result: CheckLoopResult,
) -> Result<CheckReport> {
    let CheckLoopResult {
        cancel,
        logging_task,
    } = loop_result;

    // Shutdown background tasks
    shutdown_gracefully(cancel, logging_task, resources.rate_limiter_shutdown).await;

    // Log final progress
    log_progress(
        resources.start_time,
        &resources.completed_emails,
        &resources.failed_emails,
        Some(&resources.total_attempted),
    );

    let elapsed_seconds = resources.start_time.elapsed().as_secs_f64();

    // SAFETY: Counts from a single run stay far below i32::MAX; SQLite stores
    // these columns as INTEGER.
    #[allow(clippy::cast_possible_truncation)]
    let total_emails = resources.total_attempted.load(Ordering::SeqCst) as i32;
    #[allow(clippy::cast_possible_truncation)]
    let successful_emails = resources.completed_emails.load(Ordering::SeqCst) as i32;
    #[allow(clippy::cast_possible_truncation)]
    let failed_emails_count = resources.failed_emails.load(Ordering::SeqCst) as i32;

    // Update run statistics in the database
    let stats = RunStats {
        run_id: &resources.run_id,
        total_emails,
        successful_emails,
        failed_emails: failed_emails_count,
        elapsed_seconds,
    };
    update_run_stats(&resources.pool, &stats)
        .await
        .context("Failed to update run statistics")?;

    // Checkpoint WAL file for clean database state
    if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(resources.pool.as_ref())
        .await
    {
        log::warn!(
            "Failed to checkpoint WAL file (this is non-critical): {}",
            e
        );
    }

    // Close database pool
    resources.pool.close().await;
    log::debug!("Database pool closed");

    // Print statistics
    print_error_statistics(&resources.error_stats);

    // SAFETY: The counts started as usize and are non-negative.
    #[allow(clippy::cast_sign_loss)]
    let report = CheckReport {
        total_emails: total_emails as usize,
        successful: successful_emails as usize,
        failed: failed_emails_count as usize,
        db_path: resources.config.db_path.clone(),
        run_id: resources.run_id,
        elapsed_seconds,
    };
    Ok(report)
}
