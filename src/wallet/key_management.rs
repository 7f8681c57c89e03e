// src/wallet/key_management.rs
//! Local key management for scripted signing.
//!
//! Wraps a secp256k1 private key (via the `k256` crate) in an ethers
//! [`LocalWallet`] so messages can be signed with EIP-191 `personal_sign`
//! semantics, exactly as a browser wallet would sign them.
//!
//! Also defines [`MessageSigner`], the seam through which a connected wallet
//! (or any other external signer) is injected into signature generation.

use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer};
use ethers::utils::{hex, to_checksum};
use k256::ecdsa::SigningKey;
use rand::thread_rng;

/// Errors raised while loading a private key.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("private key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("private key is not a valid secp256k1 scalar")]
    InvalidScalar,
}

/// Something that can sign a serialized message on behalf of an address.
///
/// A wallet prompt may take unbounded time, never resolve, or be declined;
/// implementations report a decline as an error.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// Signs `message` with EIP-191 `personal_sign`, returning a 0x-prefixed
    /// hex signature.
    async fn sign_message(&self, message: &str) -> anyhow::Result<String>;
}

/// Signing key held in process memory.
///
/// # Security Notes
/// - Intended for tests and scripts; production signing happens in the
///   user's wallet
/// - The key is never exposed through this type's API
#[derive(Clone, Debug)]
pub struct KeyManager {
    wallet: LocalWallet,
}

impl KeyManager {
    /// Generates a fresh random key.
    pub fn new() -> Self {
        let signing_key = SigningKey::random(&mut thread_rng());
        KeyManager {
            wallet: LocalWallet::from(signing_key),
        }
    }

    /// Loads a key from hex, with or without a `0x` prefix.
    pub fn from_private_key(private_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(private_key.trim().trim_start_matches("0x"))?;
        let signing_key = SigningKey::from_slice(&bytes).map_err(|_| KeyError::InvalidScalar)?;
        Ok(KeyManager {
            wallet: LocalWallet::from(signing_key),
        })
    }

    /// EIP-55 checksummed address of the key.
    pub fn address(&self) -> String {
        to_checksum(&self.wallet.address(), None)
    }
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSigner for KeyManager {
    async fn sign_message(&self, message: &str) -> anyhow::Result<String> {
        let signature = self.wallet.sign_message(message).await?;
        Ok(format!("0x{}", signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::crypto::verify_personal_signature;

    // Well-known first Hardhat/Anvil development key
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_address_from_private_key() {
        let key = KeyManager::from_private_key(DEV_KEY).unwrap();
        assert_eq!(key.address(), DEV_ADDRESS);

        let unprefixed = KeyManager::from_private_key(DEV_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(unprefixed.address(), DEV_ADDRESS);
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(
            KeyManager::from_private_key("0xnothex"),
            Err(KeyError::InvalidHex(_))
        ));
        assert!(matches!(
            KeyManager::from_private_key(&"00".repeat(32)),
            Err(KeyError::InvalidScalar)
        ));
    }

    #[tokio::test]
    async fn test_signature_recovers_to_address() {
        let key = KeyManager::new();
        let signature = key.sign_message("hello base").await.unwrap();

        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 2 + 65 * 2);
        assert!(verify_personal_signature("hello base", &signature, &key.address()).unwrap());
    }
}
