//! End-to-end tests for `run_check`.
//!
//! These run the whole pipeline against inputs that fail at the parse stage,
//! so no DNS or SMTP traffic is needed and the tests work offline.

use std::io::Write;

use sqlx::Row;

use dnsmx::{run_check, Config};

fn write_input(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("emails.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_run_check_records_parse_failures() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        "# test fixture\n\
         not-an-address\n\
         \n\
         @missing-local.example\n",
    );
    let db_path = dir.path().join("dnsmx.db");

    let config = Config {
        file: input,
        db_path: db_path.clone(),
        rate_limit_rps: 0,
        ..Default::default()
    };

    let report = run_check(config).await.expect("run should complete");
    assert_eq!(report.total_emails, 2);
    assert_eq!(report.successful, 0);
    assert_eq!(report.failed, 2);
    assert_eq!(report.db_path, db_path);
    assert!(report.run_id.starts_with("run_"));

    // Failures must be recorded with their categorized error type
    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}", db_path.to_string_lossy()))
        .await
        .unwrap();
    let rows = sqlx::query("SELECT email, error_type, run_id FROM email_failures")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    for row in &rows {
        let error_type: String = row.get("error_type");
        assert_eq!(error_type, "Address parse error");
        let run_id: Option<String> = row.get("run_id");
        assert_eq!(run_id.as_deref(), Some(report.run_id.as_str()));
    }

    // The run row must carry the final statistics
    let run_row = sqlx::query(
        "SELECT total_emails, successful_emails, failed_emails FROM runs WHERE run_id = ?",
    )
    .bind(&report.run_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(run_row.get::<i64, _>("total_emails"), 2);
    assert_eq!(run_row.get::<i64, _>("successful_emails"), 0);
    assert_eq!(run_row.get::<i64, _>("failed_emails"), 2);
    pool.close().await;
}

#[tokio::test]
async fn test_run_check_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "# only comments\n\n");
    let db_path = dir.path().join("dnsmx.db");

    let config = Config {
        file: input,
        db_path: db_path.clone(),
        rate_limit_rps: 0,
        ..Default::default()
    };

    let report = run_check(config).await.expect("run should complete");
    assert_eq!(report.total_emails, 0);
    assert_eq!(report.successful, 0);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn test_run_check_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        file: dir.path().join("does-not-exist.txt"),
        db_path: dir.path().join("dnsmx.db"),
        ..Default::default()
    };

    let err = run_check(config).await.expect_err("missing file must fail");
    assert!(err.to_string().contains("input file"));
}

#[tokio::test]
async fn test_run_check_reuses_existing_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("dnsmx.db");

    for _ in 0..2 {
        let input = write_input(&dir, "still-not-an-address\n");
        let config = Config {
            file: input,
            db_path: db_path.clone(),
            rate_limit_rps: 0,
            ..Default::default()
        };
        run_check(config).await.expect("run should complete");
    }

    let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}", db_path.to_string_lossy()))
        .await
        .unwrap();
    let runs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM runs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(runs, 2);
    let failures: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM email_failures")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(failures, 2);
    pool.close().await;
}
