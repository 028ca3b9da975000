//! Per-email task processing.
//!
//! This module contains the pipeline for checking a single address (parse,
//! MX lookup, optional SMTP probe, record) and the task wrapper handling
//! success/failure/timeout outcomes.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio_retry::Retry;

use crate::config::RETRY_MAX_ATTEMPTS;
use crate::dns::{lookup_implicit_mx, lookup_mx_records, MxHost};
use crate::email::EmailAddress;
use crate::error_handling::{categorize_probe_error, get_retry_strategy, ErrorType, InfoType};
use crate::smtp::Verdict;
use crate::storage::{record_email_failure, record_email_status, EmailFailureRecord, EmailRecord};

use super::resources::{EmailTaskParams, ProcessingContext};

/// A categorized check failure.
///
/// Carries the [`ErrorType`] used for statistics and the `email_failures`
/// table alongside the human-readable message.
#[derive(Debug)]
pub struct CheckError {
    pub error_type: ErrorType,
    pub message: String,
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for CheckError {}

/// Result of processing a single e-mail address.
pub struct ProcessEmailResult {
    pub result: Result<(), CheckError>,
    /// The parsed domain, when parsing got that far.
    pub domain: Option<String>,
    /// How many DNS retries were performed.
    pub retry_count: u32,
}

/// Checks one address end to end and records the outcome.
///
/// Pipeline: parse the address, look up MX records (with retry on transient
/// DNS failures), fall back to the implicit MX when the domain has none,
/// optionally verify the mailbox over SMTP, then insert an `email_status`
/// row. Every failure site increments the matching [`ErrorType`] counter.
pub async fn process_email(email: &str, ctx: &ProcessingContext) -> ProcessEmailResult {
    let start = std::time::Instant::now();

    let addr = match EmailAddress::parse(email) {
        Ok(addr) => addr,
        Err(e) => {
            ctx.error_stats.increment_error(ErrorType::AddressParseError);
            return ProcessEmailResult {
                result: Err(CheckError {
                    error_type: ErrorType::AddressParseError,
                    message: e.to_string(),
                }),
                domain: None,
                retry_count: 0,
            };
        }
    };
    let domain = addr.domain().to_string();

    // MX lookup with exponential backoff on transient failures
    let attempts = AtomicU32::new(0);
    let mx_result = Retry::spawn(get_retry_strategy(), || {
        attempts.fetch_add(1, Ordering::SeqCst);
        let resolver = Arc::clone(&ctx.resolver);
        let domain = domain.clone();
        async move { lookup_mx_records(&domain, &resolver).await }
    })
    .await;
    let retry_count = attempts.load(Ordering::SeqCst).saturating_sub(1);

    let mut mx_hosts: Vec<MxHost> = match mx_result {
        Ok(hosts) => hosts,
        Err(e) => {
            let message = e.to_string();
            let error_type = if message.to_lowercase().contains("timed out")
                || message.to_lowercase().contains("timeout")
            {
                ErrorType::DnsMxTimeoutError
            } else {
                ErrorType::DnsMxLookupError
            };
            ctx.error_stats.increment_error(error_type);
            return ProcessEmailResult {
                result: Err(CheckError {
                    error_type,
                    message,
                }),
                domain: Some(domain),
                retry_count,
            };
        }
    };

    // RFC 5321 implicit MX: a domain without MX records but with an address
    // record is its own mail host
    let mut used_implicit_mx = false;
    if mx_hosts.is_empty() {
        match lookup_implicit_mx(&domain, &ctx.resolver).await {
            Ok(Some(host)) => {
                ctx.error_stats.increment_info(InfoType::ImplicitMxFallback);
                used_implicit_mx = true;
                mx_hosts.push(host);
            }
            Ok(None) => {
                ctx.error_stats.increment_info(InfoType::NoMailServers);
                let record = EmailRecord {
                    email: addr.to_string(),
                    domain: domain.clone(),
                    mx_records: None,
                    mx_count: 0,
                    used_implicit_mx: false,
                    verdict: "no-mail-servers".to_string(),
                    smtp_code: None,
                    smtp_message: None,
                    probed_host: None,
                    response_time: start.elapsed().as_secs_f64(),
                    timestamp: Utc::now().timestamp_millis(),
                    run_id: ctx.run_id.clone(),
                };
                return finish_with_record(ctx, record, domain, retry_count).await;
            }
            Err(e) => {
                ctx.error_stats
                    .increment_error(ErrorType::DnsFallbackLookupError);
                return ProcessEmailResult {
                    result: Err(CheckError {
                        error_type: ErrorType::DnsFallbackLookupError,
                        message: e.to_string(),
                    }),
                    domain: Some(domain),
                    retry_count,
                };
            }
        }
    }

    let mx_json = serde_json::to_string(&mx_hosts).ok();
    #[allow(clippy::cast_possible_truncation)]
    let mx_count = mx_hosts.len() as u32;

    let (verdict, smtp_code, smtp_message, probed_host) = if ctx.verify {
        match ctx.probe.verify_email(&mx_hosts, &addr).await {
            Ok((verdict, host)) => {
                match &verdict {
                    Verdict::Rejected { .. } => {
                        ctx.error_stats.increment_info(InfoType::MailboxRejected);
                    }
                    Verdict::Unverifiable { code, .. } if (400..500).contains(code) => {
                        ctx.error_stats.increment_info(InfoType::Greylisted);
                    }
                    _ => {}
                }
                (
                    verdict.as_str().to_string(),
                    Some(verdict.code()),
                    Some(verdict.message().to_string()),
                    Some(host),
                )
            }
            Err(e) => {
                let error_type = categorize_probe_error(&e);
                ctx.error_stats.increment_error(error_type);
                return ProcessEmailResult {
                    result: Err(CheckError {
                        error_type,
                        message: e.to_string(),
                    }),
                    domain: Some(domain),
                    retry_count,
                };
            }
        }
    } else {
        ("mx-found".to_string(), None, None, None)
    };

    let record = EmailRecord {
        email: addr.to_string(),
        domain: domain.clone(),
        mx_records: mx_json,
        mx_count,
        used_implicit_mx,
        verdict,
        smtp_code,
        smtp_message,
        probed_host,
        response_time: start.elapsed().as_secs_f64(),
        timestamp: Utc::now().timestamp_millis(),
        run_id: ctx.run_id.clone(),
    };
    finish_with_record(ctx, record, domain, retry_count).await
}

/// Inserts the status row and folds a database error into the result.
async fn finish_with_record(
    ctx: &ProcessingContext,
    record: EmailRecord,
    domain: String,
    retry_count: u32,
) -> ProcessEmailResult {
    match record_email_status(&ctx.pool, &record).await {
        Ok(()) => ProcessEmailResult {
            result: Ok(()),
            domain: Some(domain),
            retry_count,
        },
        Err(e) => {
            ctx.error_stats
                .increment_error(ErrorType::DatabaseWriteError);
            ProcessEmailResult {
                result: Err(CheckError {
                    error_type: ErrorType::DatabaseWriteError,
                    message: e.to_string(),
                }),
                domain: Some(domain),
                retry_count,
            }
        }
    }
}

/// Process a single e-mail task.
///
/// This function is spawned as a Tokio task for each address. It handles:
/// - Rate limiting (if configured)
/// - Processing with timeout
/// - Success/failure/timeout outcome handling
pub async fn process_email_task(params: EmailTaskParams) {
    let EmailTaskParams {
        email,
        ctx,
        permit: _permit, // Hold permit until task completes
        request_limiter,
        timeout,
        completed_emails,
        failed_emails,
    } = params;

    // Apply rate limiting if configured
    if let Some(ref limiter) = request_limiter {
        limiter.acquire().await;
    }

    let process_start = std::time::Instant::now();

    let result = tokio::time::timeout(timeout, process_email(email.as_ref(), &ctx)).await;

    match result {
        Ok(ProcessEmailResult {
            result: Ok(()), ..
        }) => {
            completed_emails.fetch_add(1, Ordering::SeqCst);
        }
        Ok(ProcessEmailResult {
            result: Err(e),
            domain,
            retry_count,
        }) => {
            handle_failure(
                &email,
                e,
                domain,
                retry_count,
                process_start,
                &ctx,
                &failed_emails,
            )
            .await;
        }
        Err(_) => {
            handle_timeout(&email, timeout, process_start, &ctx, &failed_emails).await;
        }
    }
}

/// Handle failed e-mail processing.
async fn handle_failure(
    email: &Arc<str>,
    error: CheckError,
    domain: Option<String>,
    retry_count: u32,
    process_start: std::time::Instant,
    ctx: &Arc<ProcessingContext>,
    failed_emails: &Arc<AtomicUsize>,
) {
    failed_emails.fetch_add(1, Ordering::SeqCst);
    log::warn!("Failed to check {}: {error}", email.as_ref());

    let record = EmailFailureRecord {
        email: email.as_ref().to_string(),
        domain,
        error_type: error.error_type.as_str().to_string(),
        error_message: error.message,
        retry_count,
        elapsed_time: process_start.elapsed().as_secs_f64(),
        timestamp: Utc::now().timestamp_millis(),
        run_id: ctx.run_id.clone(),
    };
    if let Err(record_err) = record_email_failure(&ctx.pool, &record).await {
        log::warn!(
            "Failed to record failure for {}: {}",
            email.as_ref(),
            record_err
        );
    }
}

/// Handle e-mail processing timeout.
async fn handle_timeout(
    email: &Arc<str>,
    timeout: std::time::Duration,
    process_start: std::time::Instant,
    ctx: &Arc<ProcessingContext>,
    failed_emails: &Arc<AtomicUsize>,
) {
    failed_emails.fetch_add(1, Ordering::SeqCst);
    log::warn!(
        "Failed to check {} (timeout after {}s)",
        email.as_ref(),
        timeout.as_secs()
    );

    ctx.error_stats
        .increment_error(ErrorType::ProcessEmailTimeout);

    // The domain is cheap to re-derive for the failure row
    let domain = EmailAddress::parse(email.as_ref())
        .ok()
        .map(|a| a.domain().to_string());

    // SAFETY: RETRY_MAX_ATTEMPTS is a small compile-time constant.
    #[allow(clippy::cast_possible_truncation)]
    let record = EmailFailureRecord {
        email: email.as_ref().to_string(),
        domain,
        error_type: ErrorType::ProcessEmailTimeout.as_str().to_string(),
        error_message: format!(
            "Check timed out after {} seconds for {}",
            timeout.as_secs(),
            email.as_ref()
        ),
        retry_count: RETRY_MAX_ATTEMPTS as u32 - 1,
        elapsed_time: process_start.elapsed().as_secs_f64(),
        timestamp: Utc::now().timestamp_millis(),
        run_id: ctx.run_id.clone(),
    };
    if let Err(record_err) = record_email_failure(&ctx.pool, &record).await {
        log::warn!(
            "Failed to record timeout failure for {}: {}",
            email.as_ref(),
            record_err
        );
    }
}
