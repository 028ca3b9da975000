//! Check resource initialization.
//!
//! This module contains the `init_check_resources` function which handles
//! all setup and initialization before the main check loop begins.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::error_handling::ProcessingStats;
use crate::initialization::{init_rate_limiter, init_resolver, init_semaphore};
use crate::smtp::SmtpProbe;
use crate::storage::{init_db_pool_with_path, insert_run_metadata, run_migrations, RunMetadata};

use super::resources::{CheckResources, EmailSource, ProcessingContext};

/// Initialize all resources needed for a check run.
///
/// This function performs the following initialization steps:
/// 1. Count addresses in the input file (unless stdin)
/// 2. Set up rate limiting and concurrency control
/// 3. Initialize the database connection pool and run migrations
/// 4. Initialize the DNS resolver and SMTP probe
/// 5. Create the run metadata record
/// 6. Set up the shared processing context
///
/// # Returns
///
/// Returns a tuple of:
/// - `CheckResources` - All initialized resources
/// - `EmailSource` - The address input source (file or stdin)
/// - `usize` - Total number of addresses (0 for stdin)
///
/// # Errors
///
/// Returns an error if any initialization step fails.
pub async fn init_check_resources(
    config: Config,
) -> Result<(CheckResources, EmailSource, usize)> {
    // Determine address source and count
    let (total_lines, is_stdin) = if config.file.as_os_str() == "-" {
        info!("Reading addresses from stdin");
        (0, true)
    } else {
        let file_for_counting = tokio::fs::File::open(&config.file)
            .await
            .context("Failed to open input file for line counting")?;
        let reader = BufReader::new(file_for_counting);
        let mut count = 0usize;
        let mut counting_lines = reader.lines();
        while let Ok(Some(line)) = counting_lines.next_line().await {
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                count += 1;
            }
        }
        info!("Total addresses in file: {}", count);
        (count, false)
    };

    // Create address source
    let source = if is_stdin {
        EmailSource::Stdin(BufReader::new(tokio::io::stdin()).lines())
    } else {
        let file = tokio::fs::File::open(&config.file)
            .await
            .context("Failed to open input file")?;
        EmailSource::File(BufReader::new(file).lines())
    };

    // Initialize rate limiting
    let semaphore = init_semaphore(config.max_concurrency);
    let rate_burst = if config.rate_limit_rps > 0 {
        let rps_doubled = config.rate_limit_rps.saturating_mul(2);
        std::cmp::min(config.max_concurrency, rps_doubled as usize)
    } else {
        config.max_concurrency
    };
    let (request_limiter, rate_limiter_shutdown) =
        match init_rate_limiter(config.rate_limit_rps, rate_burst) {
            Some((limiter, shutdown)) => (Some(limiter), Some(shutdown)),
            None => (None, None),
        };

    // Initialize database -- size the pool to match concurrency so workers don't starve
    #[allow(clippy::cast_possible_truncation)]
    let pool_size = (config.max_concurrency as u32).max(1);
    let pool = init_db_pool_with_path(&config.db_path, pool_size)
        .await
        .context("Failed to initialize database pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // Initialize the resolver and probe
    let resolver = init_resolver();
    let probe = SmtpProbe::new(
        config.smtp_port,
        config.helo_name.clone(),
        config.mail_from.clone(),
    );
    if config.verify {
        info!("SMTP mailbox verification enabled (port {})", config.smtp_port);
    }

    // Create run metadata
    let start_time_epoch = Utc::now().timestamp_millis();
    let run_id = format!("run_{}", start_time_epoch);
    info!("Starting run: {}", run_id);

    let meta = RunMetadata {
        run_id: &run_id,
        start_time_ms: start_time_epoch,
        version: env!("CARGO_PKG_VERSION"),
    };
    insert_run_metadata(&pool, &meta)
        .await
        .context("Failed to insert run metadata")?;

    // Initialize statistics and counters
    let start_time = std::time::Instant::now();
    let error_stats = Arc::new(ProcessingStats::new());
    let completed_emails = Arc::new(AtomicUsize::new(0));
    let failed_emails = Arc::new(AtomicUsize::new(0));
    let total_attempted = Arc::new(AtomicUsize::new(0));

    // Create shared processing context
    let shared_ctx = Arc::new(ProcessingContext {
        resolver,
        probe,
        pool: Arc::clone(&pool),
        error_stats: Arc::clone(&error_stats),
        run_id: Some(run_id.clone()),
        verify: config.verify,
    });

    let resources = CheckResources {
        pool,
        shared_ctx,
        semaphore,
        request_limiter,
        rate_limiter_shutdown,
        error_stats,
        completed_emails,
        failed_emails,
        total_attempted,
        run_id,
        start_time,
        config,
    };

    Ok((resources, source, total_lines))
}
