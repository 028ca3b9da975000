//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the application,
//! including timeouts, size limits, and other operational parameters.

use std::time::Duration;

// constants (used as defaults)
#[allow(dead_code)]
/// Maximum concurrent checks (semaphore limit)
pub const SEMAPHORE_LIMIT: usize = 20;
pub const LOGGING_INTERVAL: usize = 5;
/// Per-email processing timeout
/// Formula: DNS timeout (3s) x attempts + SMTP connect (5s) + 4 replies x 10s would be ~50s
/// worst case, but mail servers that slow are not worth waiting for. 30s covers the
/// common path with buffer.
pub const EMAIL_PROCESSING_TIMEOUT: Duration = Duration::from_secs(30);
pub const DB_PATH: &str = "./dnsmx.db";

// Network operation timeouts
/// DNS query timeout in seconds
/// Most MX queries complete in <1s; 3s provides good buffer while failing fast
/// on slow or unresponsive DNS servers.
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// TCP connection timeout for the SMTP probe in seconds
pub const SMTP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Timeout for a single SMTP reply in seconds
/// Greeting delays of several seconds are common (tarpitting), so this is
/// deliberately longer than the connect timeout.
pub const SMTP_REPLY_TIMEOUT_SECS: u64 = 10;

/// Default SMTP port for mailbox verification
pub const DEFAULT_SMTP_PORT: u16 = 25;

// Address limits
/// Maximum accepted domain length in bytes.
/// Anything longer is rejected before the resolver sees it.
pub const MAX_DOMAIN_LENGTH: usize = 512;
/// Maximum accepted e-mail address length in bytes (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 320;

// Error message size limits
/// Maximum error message length in characters
/// Prevents database bloat from unbounded error messages; longer messages
/// are truncated with a note about the original length.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;
/// Maximum stored SMTP reply text length in characters
/// Multiline banners can run long; only the head is kept.
pub const MAX_SMTP_MESSAGE_LENGTH: usize = 500;

// Retry strategy
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of retry attempts (including initial attempt)
/// Set to 3 = initial attempt + 2 retries; keeps the worst case inside
/// EMAIL_PROCESSING_TIMEOUT.
pub const RETRY_MAX_ATTEMPTS: usize = 3;
