// src/models/auth_message.rs
//! Sign-In With Ethereum (EIP-4361) authentication message.
//!
//! Formatting and parsing are delegated to the `siwe` crate so the text stays
//! byte-compatible with every other EIP-4361 implementation, including the
//! Base Verify backend. This type adds the read accessors the rest of the
//! crate needs and the EIP-55 rendering of the signer address.

use chrono::{DateTime, SecondsFormat, Utc};
use ethers::types::Address;
use ethers::utils::to_checksum;
use std::fmt;

/// Suffix of the first line of every message, after the domain.
pub const HEADER_SUFFIX: &str = " wants you to sign in with your Ethereum account:";

/// A structured authentication message.
///
/// # Invariants
/// - `domain` is an RFC 3986 authority, `uri` an absolute URI
/// - every resource is a valid URI
/// - the expiration time, when present, is after the issuance time
#[derive(Debug, Clone)]
pub struct AuthMessage {
    inner: siwe::Message,
}

impl AuthMessage {
    /// Authority the message is scoped to, e.g. `baseverifydemo.com`.
    pub fn domain(&self) -> &str {
        self.inner.domain.as_str()
    }

    /// EIP-55 checksummed signer address.
    pub fn address(&self) -> String {
        to_checksum(&Address::from(self.inner.address), None)
    }

    pub fn statement(&self) -> Option<&str> {
        self.inner.statement.as_deref()
    }

    pub fn uri(&self) -> &str {
        self.inner.uri.as_str()
    }

    pub fn chain_id(&self) -> u64 {
        self.inner.chain_id
    }

    pub fn nonce(&self) -> &str {
        &self.inner.nonce
    }

    /// Issuance time as written in the message.
    pub fn issued_at(&self) -> String {
        self.inner.issued_at.to_string()
    }

    /// Expiration time as written in the message.
    pub fn expiration_time(&self) -> Option<String> {
        self.inner.expiration_time.as_ref().map(ToString::to_string)
    }

    /// Resources embedded in the message, in order.
    pub fn resources(&self) -> Vec<&str> {
        self.inner.resources.iter().map(|r| r.as_str()).collect()
    }

    /// The underlying EIP-4361 message.
    pub fn as_siwe(&self) -> &siwe::Message {
        &self.inner
    }
}

impl From<siwe::Message> for AuthMessage {
    fn from(inner: siwe::Message) -> Self {
        AuthMessage { inner }
    }
}

impl fmt::Display for AuthMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Formats a timestamp the way JavaScript's `Date.toISOString` does,
/// e.g. `2025-01-01T00:00:00.000Z`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
