//! Error categorization and retry strategy.
//!
//! This module provides functions to categorize errors and configure retry strategies.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use crate::smtp::ProbeError;

use super::types::ErrorType;

/// Creates an exponential backoff retry strategy.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `RETRY_INITIAL_DELAY_MS` milliseconds
/// - Backoff factor: `RETRY_FACTOR` (doubles delay each retry)
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
/// - Maximum attempts: `RETRY_MAX_ATTEMPTS` (prevents infinite retries)
///
/// # Returns
///
/// A retry strategy iterator ready for use with `tokio_retry::Retry`.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(crate::config::RETRY_MAX_ATTEMPTS)
}

/// Categorizes a [`ProbeError`] into an [`ErrorType`].
///
/// This is the unified categorization logic used by both statistics tracking
/// and failure recording to ensure consistency.
pub fn categorize_probe_error(error: &ProbeError) -> ErrorType {
    match error {
        ProbeError::Connect(_) | ProbeError::ConnectTimeout { .. } => ErrorType::SmtpConnectError,
        ProbeError::ReplyTimeout { .. } => ErrorType::SmtpTimeoutError,
        ProbeError::Greeting { .. } => ErrorType::SmtpGreetingError,
        ProbeError::Helo { .. } => ErrorType::SmtpHeloError,
        ProbeError::MailFrom { .. } => ErrorType::SmtpMailFromError,
        ProbeError::Io(_) | ProbeError::MalformedReply(_) | ProbeError::AllHostsFailed { .. } => {
            ErrorType::SmtpProtocolError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_retry_strategy_initial_delay() {
        let strategy = get_retry_strategy();
        let first_delay = strategy.take(1).next().unwrap();

        let expected_ms = crate::config::RETRY_INITIAL_DELAY_MS as u128;
        let actual_ms = first_delay.as_millis();
        assert!(
            actual_ms >= expected_ms,
            "Expected delay >= {}ms, got {}ms",
            expected_ms,
            actual_ms
        );
    }

    #[test]
    fn test_get_retry_strategy_max_delay() {
        let strategy = get_retry_strategy();
        let max_delay_ms = crate::config::RETRY_MAX_DELAY_SECS * 1000;

        for delay in strategy {
            assert!(
                delay.as_millis() <= max_delay_ms as u128,
                "Delay {}ms exceeds max {}ms",
                delay.as_millis(),
                max_delay_ms
            );
        }
    }

    #[test]
    fn test_get_retry_strategy_max_attempts() {
        let strategy = get_retry_strategy();
        assert_eq!(strategy.count(), crate::config::RETRY_MAX_ATTEMPTS);
    }

    #[test]
    fn test_categorize_connect_error() {
        let err = ProbeError::Connect(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert_eq!(categorize_probe_error(&err), ErrorType::SmtpConnectError);
    }

    #[test]
    fn test_categorize_dialogue_errors() {
        let helo = ProbeError::Helo {
            code: 502,
            message: "not implemented".into(),
        };
        assert_eq!(categorize_probe_error(&helo), ErrorType::SmtpHeloError);

        let mail_from = ProbeError::MailFrom {
            code: 550,
            message: "denied".into(),
        };
        assert_eq!(
            categorize_probe_error(&mail_from),
            ErrorType::SmtpMailFromError
        );

        let greeting = ProbeError::Greeting {
            code: 554,
            message: "no service".into(),
        };
        assert_eq!(
            categorize_probe_error(&greeting),
            ErrorType::SmtpGreetingError
        );
    }
}
