// src/message/parser.rs
//! Parser for serialized authentication messages.
//!
//! Reads EIP-4361 text back into an [`AuthMessage`] through the `siwe`
//! parser. Used on the server side to recover the declared signer of a
//! message before it is forwarded.

use crate::models::auth_message::AuthMessage;
use std::str::FromStr;

/// Errors raised while parsing a serialized message.
#[derive(Debug, thiserror::Error)]
pub enum MessageParseError {
    #[error("invalid sign-in message: {0}")]
    Invalid(#[from] siwe::ParseError),

    #[error("address '{0}' is not EIP-55 checksummed")]
    NotChecksummed(String),
}

impl FromStr for AuthMessage {
    type Err = MessageParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let message = AuthMessage::from(text.parse::<siwe::Message>()?);

        // The address line must be byte-identical to its EIP-55 form
        let written = text.lines().nth(1).unwrap_or_default();
        if written != message.address() {
            return Err(MessageParseError::NotChecksummed(written.to_string()));
        }

        Ok(message)
    }
}
