//! JSONL export functionality.
//!
//! Exports e-mail check results to JSONL (JSON Lines) format. Each line is a
//! complete JSON object for one checked address, with the MX record list as
//! a nested array. Ideal for piping to `jq` or loading into databases.

use anyhow::{Context, Result};
use futures::TryStreamExt;
use serde_json::Value;
use std::io::{self, Write};

use crate::storage::init_db_pool_with_path;

use super::queries::{build_where_clause, SELECT_COLUMNS};
use super::row::ExportRow;
use super::ExportOptions;

/// Exports data to JSONL format (JSON Lines).
///
/// # Arguments
///
/// * `opts` - Export options including database path, output, and filters
///
/// # Returns
///
/// Returns the number of records exported, or an error if export fails.
pub async fn export_jsonl(opts: &ExportOptions) -> Result<usize> {
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

    let mut writer: Box<dyn Write> = if let Some(output_path) = opts.output.as_ref() {
        let file = std::fs::File::create(output_path).context(format!(
            "Failed to create output file: {}",
            output_path.display()
        ))?;
        Box::new(file)
    } else {
        Box::new(io::stdout())
    };

    let query = query_builder.build();
    let mut rows = query.fetch(pool.as_ref());
    let mut count = 0usize;

    while let Some(row) = rows.try_next().await.context("Failed to fetch row")? {
        let row = ExportRow::from_row(&row);

        // Re-parse the stored JSON so consumers get a nested array rather
        // than a doubly-encoded string
        let mx_records: Value = row
            .mx_records
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(Value::Null);

        let mut object = serde_json::to_value(&row).context("Failed to serialize row")?;
        object["mx_records"] = mx_records;

        serde_json::to_writer(&mut writer, &object)?;
        writeln!(writer)?;
        count += 1;
    }

    writer.flush().context("Failed to flush output")?;
    Ok(count)
}
