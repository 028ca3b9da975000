//! E-mail address parsing and validation.
//!
//! This module provides the [`EmailAddress`] type which splits an address
//! into its local part and domain and enforces the input rules the checker
//! relies on:
//! - the address must follow the `name@domain` format
//! - the domain must be at most `MAX_DOMAIN_LENGTH` bytes
//! - the domain must consist of valid hostname labels
//!
//! Quoted local parts, domain literals, and internationalized addresses are
//! intentionally out of scope.

use std::fmt;

use thiserror::Error;

use crate::config::{MAX_DOMAIN_LENGTH, MAX_EMAIL_LENGTH};

/// Errors produced when parsing an e-mail address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The address has no `@` separator.
    #[error("the email must respect the name@domain format")]
    MissingAtSign,

    /// Nothing before the `@`.
    #[error("the local part of the address is empty")]
    EmptyLocalPart,

    /// Nothing after the `@`.
    #[error("the domain of the address is empty")]
    EmptyDomain,

    /// The whole address exceeds `MAX_EMAIL_LENGTH` bytes.
    #[error("the address must not be longer than {MAX_EMAIL_LENGTH} characters")]
    AddressTooLong,

    /// The domain exceeds `MAX_DOMAIN_LENGTH` bytes.
    #[error("the domain name must not be longer than {MAX_DOMAIN_LENGTH} characters")]
    DomainTooLong,

    /// The domain contains an empty or malformed label.
    #[error("invalid domain label in {0:?}")]
    InvalidDomainLabel(String),

    /// The local part contains whitespace or control characters.
    #[error("invalid character in the local part")]
    InvalidLocalPart,
}

/// A validated e-mail address split into local part and domain.
///
/// The domain is lowercased on parse; the local part is kept verbatim
/// (local parts are case-sensitive per RFC 5321, even though almost no
/// receiver treats them that way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    local: String,
    domain: String,
}

impl EmailAddress {
    /// Parses and validates an e-mail address.
    ///
    /// The address is split on the **last** `@` so that local parts
    /// containing `@` in quoted form fail label validation rather than
    /// producing a bogus domain.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] describing the first rule the input
    /// violates.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let input = input.trim();

        let at = input.rfind('@').ok_or(AddressError::MissingAtSign)?;
        let (local, domain) = input.split_at(at);
        let domain = &domain[1..];

        if local.is_empty() {
            return Err(AddressError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(AddressError::EmptyDomain);
        }
        if domain.len() > MAX_DOMAIN_LENGTH {
            return Err(AddressError::DomainTooLong);
        }
        if input.len() > MAX_EMAIL_LENGTH {
            return Err(AddressError::AddressTooLong);
        }
        if local
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '@')
        {
            return Err(AddressError::InvalidLocalPart);
        }

        // A trailing dot (fully-qualified form) is accepted and stripped.
        let domain = domain.strip_suffix('.').unwrap_or(domain);
        validate_domain_labels(domain)?;

        Ok(EmailAddress {
            local: local.to_string(),
            domain: domain.to_ascii_lowercase(),
        })
    }

    /// The part before the `@`, verbatim.
    pub fn local(&self) -> &str {
        &self.local
    }

    /// The lowercased domain, without any trailing dot.
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

/// Checks that every dot-separated label is non-empty, made of
/// `[A-Za-z0-9-]`, and neither starts nor ends with a hyphen.
fn validate_domain_labels(domain: &str) -> Result<(), AddressError> {
    for label in domain.split('.') {
        let valid = !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(AddressError::InvalidDomainLabel(domain.to_string()));
        }
    }
    Ok(())
}
