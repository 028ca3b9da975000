// Shared test helpers for database setup and test data creation.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use sqlx::SqlitePool;

use dnsmx::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Creates a test database pool from a file path, applying migrations.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool_with_path(db_path: &std::path::Path) -> SqlitePool {
    std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .read(true)
        .open(db_path)
        .expect("Failed to create/open database file");

    let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.to_string_lossy()))
        .await
        .expect("Failed to create test database");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Inserts a test email_status record and returns its ID.
#[allow(dead_code)] // Used by other test files
pub async fn insert_test_email_status(
    pool: &SqlitePool,
    email: &str,
    domain: &str,
    verdict: &str,
    run_id: Option<&str>,
) -> i64 {
    let mx_records = r#"[{"preference":10,"exchange":"mx1.example.com"}]"#;
    let result = sqlx::query(
        "INSERT INTO email_status (
            email, domain, mx_records, mx_count, used_implicit_mx, verdict,
            smtp_code, smtp_message, probed_host, response_time, timestamp, run_id
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(email)
    .bind(domain)
    .bind(mx_records)
    .bind(1i64)
    .bind(false)
    .bind(verdict)
    .bind(Option::<i64>::None)
    .bind(Option::<String>::None)
    .bind(Option::<String>::None)
    .bind(0.042f64)
    .bind(1_700_000_000_000i64)
    .bind(run_id)
    .execute(pool)
    .await
    .expect("Failed to insert test record");
    result.last_insert_rowid()
}
