//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dnsmx` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use dnsmx::initialization::init_logger_with;
use dnsmx::{export_csv, export_jsonl, run_check, Config, ExportFormat, ExportOptions};

#[derive(Debug, Parser)]
#[command(
    name = "dnsmx",
    about = "Queries DNS MX records for a list of e-mail addresses and verifies mailboxes over SMTP."
)]
enum Cli {
    /// Check a list of e-mail addresses
    #[command(name = "check")]
    Check(Config),
    /// Export recorded results
    #[command(name = "export")]
    Export(ExportCommand),
}

#[derive(Debug, Parser)]
struct ExportCommand {
    /// Database path (SQLite file)
    #[arg(long, default_value = "./dnsmx.db")]
    db_path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Filter by run ID
    #[arg(long)]
    run_id: Option<String>,

    /// Filter by domain
    #[arg(long)]
    domain: Option<String>,

    /// Filter by verdict (deliverable|rejected|unverifiable|mx-found|no-mail-servers)
    #[arg(long)]
    verdict: Option<String>,

    /// Filter by timestamp (milliseconds since epoch)
    #[arg(long)]
    since: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    match Cli::parse() {
        Cli::Check(config) => {
            let log_level = config.log_level.clone();
            let log_format = config.log_format.clone();
            init_logger_with(log_level.into(), log_format)
                .context("Failed to initialize logger")?;

            match run_check(config).await {
                Ok(report) => {
                    println!(
                        "Checked {} address{} ({} succeeded, {} failed) in {:.1}s - see database for details",
                        report.total_emails,
                        if report.total_emails == 1 { "" } else { "es" },
                        report.successful,
                        report.failed,
                        report.elapsed_seconds
                    );
                    println!("Results saved in {}", report.db_path.display());
                    Ok(())
                }
                Err(e) => {
                    eprintln!("dnsmx error: {:#}", e);
                    process::exit(1);
                }
            }
        }
        Cli::Export(cmd) => {
            let opts = ExportOptions {
                db_path: cmd.db_path,
                output: cmd.output,
                format: cmd.format.clone(),
                run_id: cmd.run_id,
                domain: cmd.domain,
                verdict: cmd.verdict,
                since: cmd.since,
            };
            let count = match opts.format {
                ExportFormat::Csv => export_csv(&opts).await?,
                ExportFormat::Jsonl => export_jsonl(&opts).await?,
            };
            eprintln!("Exported {count} record{}", if count == 1 { "" } else { "s" });
            Ok(())
        }
    }
}
