//! MX record queries and the implicit-MX fallback.

use anyhow::{Error, Result};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use serde::{Deserialize, Serialize};

/// A single mail exchanger: preference value plus exchange hostname.
///
/// Lower preference means higher priority. The exchange hostname is stored
/// without the trailing root dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxHost {
    pub preference: u16,
    pub exchange: String,
}

impl MxHost {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        let mut exchange = exchange.into();
        if exchange.ends_with('.') {
            exchange.pop();
        }
        MxHost {
            preference,
            exchange,
        }
    }
}

/// Queries MX (mail exchanger) records for a domain.
///
/// # Arguments
///
/// * `domain` - The domain to query
/// * `resolver` - The DNS resolver instance
///
/// # Returns
///
/// A vector of [`MxHost`] entries sorted by preference (lower = higher
/// priority). A domain with no MX records (including NXDOMAIN) yields an
/// empty vector; only transport-level failures (timeouts, network errors)
/// are returned as errors so they can be recorded as failures.
pub async fn lookup_mx_records(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<MxHost>, Error> {
    match resolver.lookup(domain, RecordType::MX).await {
        Ok(lookup) => {
            let mut mx_records: Vec<MxHost> = lookup
                .iter()
                .filter_map(|rdata| {
                    if let RData::MX(mx) = rdata {
                        Some(MxHost::new(mx.preference(), mx.exchange().to_utf8()))
                    } else {
                        None
                    }
                })
                .collect();
            mx_records.sort_by(|a, b| {
                a.preference
                    .cmp(&b.preference)
                    .then_with(|| a.exchange.cmp(&b.exchange))
            });
            Ok(mx_records)
        }
        Err(e) => match e.kind() {
            // "no records found" is expected for domains without mail servers
            ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
            ResolveErrorKind::Timeout => {
                log::warn!("MX record lookup timed out for {domain}: {e}");
                Err(e.into())
            }
            _ => {
                log::warn!("Failed to lookup MX records for {domain}: {e}");
                Err(e.into())
            }
        },
    }
}

/// Resolves the implicit mail exchanger for a domain without MX records.
///
/// RFC 5321 section 5.1: when a domain has no MX records, an A or AAAA
/// record for the domain itself designates it as its own mail host with
/// preference 0.
///
/// # Returns
///
/// `Ok(Some(host))` when the domain has an address record, `Ok(None)` when
/// it has none, and `Err` for transport-level failures.
pub async fn lookup_implicit_mx(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Option<MxHost>, Error> {
    match resolver.lookup_ip(domain).await {
        Ok(response) => Ok(response
            .iter()
            .next()
            .map(|_| MxHost::new(0, domain.to_string()))),
        Err(e) => match e.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => Ok(None),
            _ => {
                log::warn!("Implicit MX lookup failed for {domain}: {e}");
                Err(e.into())
            }
        },
    }
}
