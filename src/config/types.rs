//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DB_PATH, DEFAULT_SMTP_PORT, EMAIL_PROCESSING_TIMEOUT};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Check configuration and CLI options.
///
/// This struct doubles as the `check` subcommand's argument set (via `clap`)
/// and the library configuration. All options have defaults, so it can be
/// constructed programmatically with `..Default::default()`.
///
/// # Examples
///
/// ```no_run
/// use dnsmx::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("emails.txt"),
///     max_concurrency: 50,
///     verify: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// File to read e-mail addresses from ("-" for stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Maximum concurrent checks
    ///
    /// Lower default (20) keeps the probe polite; hammering a single mail
    /// provider from one IP gets the address blocklisted quickly.
    #[arg(long, default_value_t = 20)]
    pub max_concurrency: usize,

    /// Per-email timeout in seconds
    #[arg(long, default_value_t = EMAIL_PROCESSING_TIMEOUT.as_secs())]
    pub timeout_seconds: u64,

    /// Checks per second rate limit (0 disables limiting)
    #[arg(long, default_value_t = 10)]
    pub rate_limit_rps: u32,

    /// Verify mailboxes over SMTP (RCPT TO probe) after the MX lookup
    #[arg(long, default_value_t = false)]
    pub verify: bool,

    /// SMTP port used for verification
    #[arg(long, default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    /// Hostname announced in HELO (defaults to the local hostname)
    #[arg(long)]
    pub helo_name: Option<String>,

    /// Envelope sender for MAIL FROM (defaults to the null reverse-path <>)
    #[arg(long)]
    pub mail_from: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("emails.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            max_concurrency: 20,
            timeout_seconds: EMAIL_PROCESSING_TIMEOUT.as_secs(),
            rate_limit_rps: 10,
            verify: false,
            smtp_port: DEFAULT_SMTP_PORT,
            helo_name: None,
            mail_from: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        // Test all LogLevel variants convert correctly to log::LevelFilter
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_log_level_ordering() {
        // Each level should be more restrictive than the next
        let error = log::LevelFilter::from(LogLevel::Error);
        let warn = log::LevelFilter::from(LogLevel::Warn);
        let info = log::LevelFilter::from(LogLevel::Info);
        let debug = log::LevelFilter::from(LogLevel::Debug);
        let trace = log::LevelFilter::from(LogLevel::Trace);

        assert!(error < warn);
        assert!(warn < info);
        assert!(info < debug);
        assert!(debug < trace);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 20);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.rate_limit_rps, 10);
        assert_eq!(config.smtp_port, 25);
        assert!(!config.verify);
        assert!(config.helo_name.is_none());
        assert!(config.mail_from.is_none());
        assert_eq!(config.db_path, PathBuf::from("./dnsmx.db"));
    }

    #[test]
    fn test_log_format_debug() {
        assert_eq!(format!("{:?}", LogFormat::Plain), "Plain");
        assert_eq!(format!("{:?}", LogFormat::Json), "Json");
    }
}
