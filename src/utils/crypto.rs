// src/utils/crypto.rs
//! Signature verification helpers (Ethereum-compatible).
//!
//! Signatures are EIP-191 `personal_sign` signatures over the UTF-8 message,
//! the scheme every browser wallet uses for sign-in messages.

use ethers::types::{Address, Signature};
use std::str::FromStr;

/// Errors raised while decoding signature inputs.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

/// Parses a 0x-prefixed hex address, accepting any letter case.
pub fn parse_address(address: &str) -> Result<Address, CryptoError> {
    Address::from_str(address.trim()).map_err(|_| CryptoError::InvalidAddress(address.to_string()))
}

/// Recovers the address that produced `signature` over `message`.
pub fn recover_signer(message: &str, signature: &str) -> Result<Address, CryptoError> {
    let signature = Signature::from_str(signature.trim())
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    signature
        .recover(message)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
}

/// Checks that `signature` over `message` was produced by `address`.
///
/// # Returns
/// - `Ok(true)` when the recovered signer is `address`
/// - `Ok(false)` when the signature is well-formed but from another key
/// - `Err` when the address or signature cannot be decoded
pub fn verify_personal_signature(
    message: &str,
    signature: &str,
    address: &str,
) -> Result<bool, CryptoError> {
    let expected = parse_address(address)?;
    Ok(recover_signer(message, signature)? == expected)
}

/// Compares two addresses ignoring letter case (checksummed vs lower-case).
pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
