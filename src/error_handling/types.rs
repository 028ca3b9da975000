//! Error type definitions.
//!
//! This module defines all error and info types used throughout the application.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    #[allow(dead_code)] // Reserved for future use if resolver construction can fail
    DnsResolverError(String),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Types of errors that can occur while checking an e-mail address.
///
/// This enum categorizes actual error conditions - failures that prevent a
/// check from completing or indicate system/network problems. Protocol
/// outcomes (mailbox rejected, no MX records) are not errors; see [`InfoType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Input errors
    AddressParseError,
    // DNS errors
    DnsMxLookupError,
    DnsMxTimeoutError,
    DnsFallbackLookupError,
    // SMTP probe errors
    SmtpConnectError,
    SmtpGreetingError,
    SmtpHeloError,
    SmtpMailFromError,
    SmtpTimeoutError,
    SmtpProtocolError,
    // Pipeline errors
    ProcessEmailTimeout,
    DatabaseWriteError,
}

/// Types of informational metrics that can occur during a check.
///
/// Info metrics track notable outcomes that aren't failures, such as
/// implicit-MX fallback or a greylisting response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// Domain has no MX records but an A/AAAA record was used (RFC 5321 implicit MX)
    ImplicitMxFallback,
    /// Domain has neither MX nor address records
    NoMailServers,
    /// RCPT TO was refused with a transient 4xx reply (greylisting/tempfail)
    Greylisted,
    /// RCPT TO was refused with a permanent 5xx reply
    MailboxRejected,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::AddressParseError => "Address parse error",
            ErrorType::DnsMxLookupError => "DNS MX lookup error",
            ErrorType::DnsMxTimeoutError => "DNS MX lookup timeout",
            ErrorType::DnsFallbackLookupError => "DNS fallback lookup error",
            ErrorType::SmtpConnectError => "SMTP connect error",
            ErrorType::SmtpGreetingError => "SMTP greeting error",
            ErrorType::SmtpHeloError => "SMTP HELO error",
            ErrorType::SmtpMailFromError => "SMTP MAIL FROM error",
            ErrorType::SmtpTimeoutError => "SMTP reply timeout",
            ErrorType::SmtpProtocolError => "SMTP protocol error",
            ErrorType::ProcessEmailTimeout => "Process email timeout",
            ErrorType::DatabaseWriteError => "Database write error",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::ImplicitMxFallback => "Implicit MX fallback (A/AAAA)",
            InfoType::NoMailServers => "No mail servers",
            InfoType::Greylisted => "Greylisted (transient refusal)",
            InfoType::MailboxRejected => "Mailbox rejected",
        }
    }
}
