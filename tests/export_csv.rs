//! Tests for CSV and JSONL export.

mod helpers;

use std::path::PathBuf;

use dnsmx::{export_csv, export_jsonl, ExportFormat, ExportOptions};

fn options(db_path: PathBuf, output: Option<PathBuf>) -> ExportOptions {
    ExportOptions {
        db_path,
        output,
        format: ExportFormat::Csv,
        run_id: None,
        domain: None,
        verdict: None,
        since: None,
    }
}

#[tokio::test]
async fn test_export_csv_writes_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = helpers::create_test_pool_with_path(&db_path).await;

    helpers::insert_test_email_status(&pool, "a@example.com", "example.com", "mx-found", None)
        .await;
    helpers::insert_test_email_status(&pool, "b@example.org", "example.org", "deliverable", None)
        .await;
    pool.close().await;

    let output = dir.path().join("out.csv");
    let count = export_csv(&options(db_path, Some(output.clone())))
        .await
        .expect("export should succeed");
    assert_eq!(count, 2);

    let content = std::fs::read_to_string(&output).unwrap();
    let mut lines = content.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,email,domain,mx_count"));
    assert_eq!(lines.count(), 2);
    assert!(content.contains("a@example.com"));
    assert!(content.contains("b@example.org"));
}

#[tokio::test]
async fn test_export_csv_filters_by_domain() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = helpers::create_test_pool_with_path(&db_path).await;

    helpers::insert_test_email_status(&pool, "a@example.com", "example.com", "mx-found", None)
        .await;
    helpers::insert_test_email_status(&pool, "b@example.org", "example.org", "mx-found", None)
        .await;
    pool.close().await;

    let output = dir.path().join("out.csv");
    let mut opts = options(db_path, Some(output.clone()));
    opts.domain = Some("example.org".to_string());
    let count = export_csv(&opts).await.expect("export should succeed");
    assert_eq!(count, 1);

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(!content.contains("a@example.com"));
    assert!(content.contains("b@example.org"));
}

#[tokio::test]
async fn test_export_csv_filters_by_run_id() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = helpers::create_test_pool_with_path(&db_path).await;

    helpers::insert_test_email_status(
        &pool,
        "a@example.com",
        "example.com",
        "mx-found",
        Some("run_1"),
    )
    .await;
    helpers::insert_test_email_status(
        &pool,
        "b@example.com",
        "example.com",
        "mx-found",
        Some("run_2"),
    )
    .await;
    pool.close().await;

    let output = dir.path().join("out.csv");
    let mut opts = options(db_path, Some(output.clone()));
    opts.run_id = Some("run_2".to_string());
    let count = export_csv(&opts).await.expect("export should succeed");
    assert_eq!(count, 1);

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("b@example.com"));
    assert!(!content.contains("a@example.com"));
}

#[tokio::test]
async fn test_export_jsonl_nested_mx_records() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = helpers::create_test_pool_with_path(&db_path).await;

    helpers::insert_test_email_status(&pool, "a@example.com", "example.com", "mx-found", None)
        .await;
    pool.close().await;

    let output = dir.path().join("out.jsonl");
    let count = export_jsonl(&options(db_path, Some(output.clone())))
        .await
        .expect("export should succeed");
    assert_eq!(count, 1);

    let content = std::fs::read_to_string(&output).unwrap();
    let line = content.lines().next().expect("one JSON line");
    let object: serde_json::Value = serde_json::from_str(line).expect("valid JSON");

    assert_eq!(object["email"], "a@example.com");
    assert_eq!(object["verdict"], "mx-found");
    // mx_records must come back as a nested array, not a doubly-encoded string
    assert!(object["mx_records"].is_array());
    assert_eq!(object["mx_records"][0]["exchange"], "mx1.example.com");
    assert_eq!(object["mx_records"][0]["preference"], 10);
}

#[tokio::test]
async fn test_export_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = helpers::create_test_pool_with_path(&db_path).await;
    pool.close().await;

    let output = dir.path().join("out.csv");
    let count = export_csv(&options(db_path, Some(output.clone())))
        .await
        .expect("export of empty database should succeed");
    assert_eq!(count, 0);

    // Header only
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 1);
}
