//! CSV export functionality.
//!
//! Exports e-mail check results to CSV format (flattened view). One row per
//! checked address; the MX record list stays as its JSON string in a single
//! column.

use anyhow::{Context, Result};
use csv::Writer;
use futures::TryStreamExt;
use std::io::{self, Write};

use crate::storage::init_db_pool_with_path;

use super::queries::{build_where_clause, SELECT_COLUMNS};
use super::row::ExportRow;
use super::ExportOptions;

/// Exports data to CSV format.
///
/// # Arguments
///
/// * `opts` - Export options including database path, output, and filters
///
/// # Returns
///
/// Returns the number of records exported, or an error if export fails.
pub async fn export_csv(opts: &ExportOptions) -> Result<usize> {
    let pool = init_db_pool_with_path(&opts.db_path, 5)
        .await
        .context("Failed to initialize database pool")?;

    let mut query_builder = sqlx::QueryBuilder::new(SELECT_COLUMNS);
    build_where_clause(
        &mut query_builder,
        opts.run_id.as_deref(),
        opts.domain.as_deref(),
        opts.verdict.as_deref(),
        opts.since,
    );

    // Create CSV writer (use trait object to handle both File and Stdout)
    let mut writer: Writer<Box<dyn Write>> = if let Some(output_path) = opts.output.as_ref() {
        let file = std::fs::File::create(output_path).context(format!(
            "Failed to create output file: {}",
            output_path.display()
        ))?;
        Writer::from_writer(Box::new(file) as Box<dyn Write>)
    } else {
        Writer::from_writer(Box::new(io::stdout()) as Box<dyn Write>)
    };

    writer.write_record([
        "id",
        "email",
        "domain",
        "mx_count",
        "used_implicit_mx",
        "mx_records",
        "verdict",
        "smtp_code",
        "smtp_message",
        "probed_host",
        "response_time",
        "timestamp",
        "run_id",
    ])?;

    let query = query_builder.build();
    let mut rows = query.fetch(pool.as_ref());
    let mut count = 0usize;

    while let Some(row) = rows.try_next().await.context("Failed to fetch row")? {
        let row = ExportRow::from_row(&row);
        writer.write_record([
            row.id.to_string(),
            row.email,
            row.domain,
            row.mx_count.to_string(),
            row.used_implicit_mx.to_string(),
            row.mx_records.unwrap_or_default(),
            row.verdict,
            row.smtp_code.map(|c| c.to_string()).unwrap_or_default(),
            row.smtp_message.unwrap_or_default(),
            row.probed_host.unwrap_or_default(),
            row.response_time.to_string(),
            row.timestamp.to_string(),
            row.run_id.unwrap_or_default(),
        ])?;
        count += 1;
    }

    writer.flush().context("Failed to flush CSV writer")?;
    Ok(count)
}
