//! Database schema management.
//!
//! All statements are idempotent (`CREATE TABLE IF NOT EXISTS`), so running
//! them against an existing database is a no-op.

use sqlx::{Pool, Sqlite};

/// Creates the schema if it doesn't exist yet.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), anyhow::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS runs (
            run_id TEXT PRIMARY KEY,
            start_time_ms INTEGER NOT NULL,
            version TEXT NOT NULL,
            total_emails INTEGER,
            successful_emails INTEGER,
            failed_emails INTEGER,
            elapsed_seconds REAL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS email_status (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL,
            domain TEXT NOT NULL,
            mx_records TEXT,
            mx_count INTEGER NOT NULL,
            used_implicit_mx INTEGER NOT NULL DEFAULT 0,
            verdict TEXT NOT NULL,
            smtp_code INTEGER,
            smtp_message TEXT,
            probed_host TEXT,
            response_time REAL NOT NULL,
            timestamp INTEGER NOT NULL,
            run_id TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS email_failures (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL,
            domain TEXT,
            error_type TEXT NOT NULL,
            error_message TEXT NOT NULL,
            retry_count INTEGER NOT NULL DEFAULT 0,
            elapsed_time REAL,
            timestamp INTEGER NOT NULL,
            run_id TEXT
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_email_status_run_id ON email_status(run_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_email_status_domain ON email_status(domain)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_email_failures_run_id ON email_failures(run_id)")
        .execute(pool)
        .await?;

    Ok(())
}
