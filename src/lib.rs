//! dnsmx library: DNS MX lookup and SMTP mailbox verification
//!
//! This library provides high-level APIs for checking e-mail addresses:
//! resolving the MX records of each address's domain and, optionally,
//! verifying the mailbox by speaking a minimal SMTP dialogue (HELO,
//! MAIL FROM, RCPT TO) to the domain's mail exchangers. Results are
//! captured in a SQLite database and can be exported as CSV or JSONL.
//!
//! # Example
//!
//! ```no_run
//! use dnsmx::{Config, run_check};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("emails.txt"),
//!     max_concurrency: 50,
//!     verify: true,
//!     ..Default::default()
//! };
//!
//! let report = run_check(config).await?;
//! println!("Checked {} addresses: {} succeeded, {} failed",
//!          report.total_emails, report.successful, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

mod app;
pub mod config;
pub mod dns;
pub mod email;
mod error_handling;
pub mod export;
pub mod initialization;
mod run;
pub mod smtp;
mod storage;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use dns::{lookup_implicit_mx, lookup_mx_records, MxHost};
pub use email::{AddressError, EmailAddress};
pub use export::{export_csv, export_jsonl, ExportFormat, ExportOptions};
pub use run::{run_check, CheckReport};
pub use smtp::{ProbeError, SmtpProbe, Verdict};
pub use storage::run_migrations;
