//! DNS resolution and record querying.
//!
//! This module provides async DNS operations using `hickory-resolver`:
//! - Mail exchanger queries (MX records), sorted by preference
//! - The RFC 5321 implicit-MX fallback (A/AAAA records)
//!
//! All operations are async and respect the resolver timeouts configured
//! at initialization.

mod mx;

// Re-export public API
pub use mx::{lookup_implicit_mx, lookup_mx_records, MxHost};
