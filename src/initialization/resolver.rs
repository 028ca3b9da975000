//! DNS resolver initialization.
//!
//! This module provides functions to initialize the DNS resolver with proper
//! timeout configuration.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;

/// Initializes the DNS resolver for MX and address lookups.
///
/// Creates a resolver using the default configuration with aggressive
/// timeouts to prevent hanging on slow or unresponsive DNS servers.
///
/// # Returns
///
/// A configured `TokioAsyncResolver` wrapped in `Arc` for sharing across tasks.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    use hickory_resolver::config::{ResolverConfig, ResolverOpts};

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(crate::config::DNS_TIMEOUT_SECS);
    opts.attempts = 2; // Reduce retry attempts to fail faster
    opts.ndots = 0; // Prevent search domain appending

    Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts))
}
