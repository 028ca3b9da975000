//! Database insert operations.
//!
//! This module provides functions to insert records into the database:
//! - Completed e-mail checks and failures
//! - Run metadata and statistics
//!
//! All inserts use parameterized queries to prevent SQL injection.

use sqlx::SqlitePool;

use crate::config::MAX_ERROR_MESSAGE_LENGTH;
use crate::error_handling::DatabaseError;

use super::models::{EmailFailureRecord, EmailRecord, RunMetadata, RunStats};

/// Truncates an error message so unbounded reply text can't bloat the database.
///
/// Messages longer than `MAX_ERROR_MESSAGE_LENGTH` are cut at a char boundary
/// with a note about the original length.
fn truncate_error_message(message: &str) -> String {
    if message.len() <= MAX_ERROR_MESSAGE_LENGTH {
        return message.to_string();
    }
    let mut cut = MAX_ERROR_MESSAGE_LENGTH;
    while !message.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}... [truncated, original length {} chars]",
        &message[..cut],
        message.len()
    )
}

/// Inserts a completed e-mail check into the `email_status` table.
pub async fn record_email_status(
    pool: &SqlitePool,
    record: &EmailRecord,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO email_status (
            email, domain, mx_records, mx_count, used_implicit_mx, verdict,
            smtp_code, smtp_message, probed_host, response_time, timestamp, run_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.email)
    .bind(&record.domain)
    .bind(&record.mx_records)
    .bind(record.mx_count)
    .bind(record.used_implicit_mx)
    .bind(&record.verdict)
    .bind(record.smtp_code)
    .bind(&record.smtp_message)
    .bind(&record.probed_host)
    .bind(record.response_time)
    .bind(record.timestamp)
    .bind(&record.run_id)
    .execute(pool)
    .await
    .map_err(|e| {
        log::error!("Error when accessing the database: {}", e);
        DatabaseError::SqlError(e)
    })?;

    Ok(())
}

/// Inserts a failed e-mail check into the `email_failures` table.
pub async fn record_email_failure(
    pool: &SqlitePool,
    record: &EmailFailureRecord,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO email_failures (
            email, domain, error_type, error_message, retry_count,
            elapsed_time, timestamp, run_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.email)
    .bind(&record.domain)
    .bind(&record.error_type)
    .bind(truncate_error_message(&record.error_message))
    .bind(record.retry_count)
    .bind(record.elapsed_time)
    .bind(record.timestamp)
    .bind(&record.run_id)
    .execute(pool)
    .await
    .map_err(|e| {
        log::error!("Error when recording failure: {}", e);
        DatabaseError::SqlError(e)
    })?;

    Ok(())
}

/// Inserts the metadata row for a starting run.
pub async fn insert_run_metadata(
    pool: &SqlitePool,
    meta: &RunMetadata<'_>,
) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO runs (run_id, start_time_ms, version) VALUES (?, ?, ?)")
        .bind(meta.run_id)
        .bind(meta.start_time_ms)
        .bind(meta.version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Updates the run row with final statistics.
pub async fn update_run_stats(pool: &SqlitePool, stats: &RunStats<'_>) -> Result<(), DatabaseError> {
    sqlx::query(
        "UPDATE runs SET total_emails = ?, successful_emails = ?, failed_emails = ?,
         elapsed_seconds = ? WHERE run_id = ?",
    )
    .bind(stats.total_emails)
    .bind(stats.successful_emails)
    .bind(stats.failed_emails)
    .bind(stats.elapsed_seconds)
    .bind(stats.run_id)
    .execute(pool)
    .await?;

    Ok(())
}
