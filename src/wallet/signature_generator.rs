// src/wallet/signature_generator.rs
//! Signature generation for authentication messages.
//!
//! Resolves a signer, builds the message for the requested action, provider
//! and traits, and has the signer sign it. Signing is the only suspension
//! point: a wallet prompt can take arbitrarily long or be declined, and no
//! timeout or retry is applied here.

use crate::message::builder::{MessageBuildError, MessageBuilder, MessageOptions};
use crate::models::signature::GeneratedSignature;
use crate::models::trait_requirement::TraitRequirements;
use crate::wallet::key_management::{KeyError, KeyManager, MessageSigner};
use log::{debug, error, warn};
use std::sync::Arc;

pub const DEFAULT_ACTION: &str = "create_verification_url";
pub const DEFAULT_PROVIDER: &str = "x";

/// Lower-cased fragments that identify a user declining a wallet prompt.
const REJECTION_KEYWORDS: [&str; 5] = ["user rejected", "user denied", "rejected", "denied", "cancel"];

/// Errors raised by [`generate_signature`].
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("Either a private key or both a signer and an address must be provided")]
    MissingCredential,

    #[error("Failed to generate signature: {0}")]
    InvalidPrivateKey(#[from] KeyError),

    #[error("Failed to generate signature: {0}")]
    InvalidMessage(#[from] MessageBuildError),

    #[error("Failed to generate signature: {message}")]
    SignerFailure { message: String },
}

impl SignatureError {
    /// Whether the failure is the user declining the signature request.
    ///
    /// Callers abort the flow either way but skip the error banner for a
    /// decline.
    pub fn is_user_rejection(&self) -> bool {
        match self {
            SignatureError::SignerFailure { message } => {
                let message = message.to_lowercase();
                REJECTION_KEYWORDS.iter().any(|keyword| message.contains(keyword))
            }
            _ => false,
        }
    }
}

/// Inputs for [`generate_signature`].
///
/// Supply either `signer` together with `address` (connected wallet) or
/// `private_key` (scripts and tests). `action` and `provider` default to
/// [`DEFAULT_ACTION`] and [`DEFAULT_PROVIDER`] when unset.
#[derive(Clone, Default)]
pub struct GenerateSignatureOptions {
    pub private_key: Option<String>,
    pub signer: Option<Arc<dyn MessageSigner>>,
    pub address: Option<String>,
    pub action: Option<String>,
    pub provider: Option<String>,
    pub traits: TraitRequirements,
    pub verification_id: Option<String>,
    pub domain: Option<String>,
    pub uri: Option<String>,
    pub chain_id: Option<u64>,
    pub statement: Option<String>,
}

impl GenerateSignatureOptions {
    /// Options signing with an in-memory private key.
    pub fn with_private_key(private_key: impl Into<String>) -> Self {
        GenerateSignatureOptions {
            private_key: Some(private_key.into()),
            ..Default::default()
        }
    }

    /// Options signing through an external signer for `address`.
    pub fn with_signer(signer: Arc<dyn MessageSigner>, address: impl Into<String>) -> Self {
        GenerateSignatureOptions {
            signer: Some(signer),
            address: Some(address.into()),
            ..Default::default()
        }
    }
}

/// Builds and signs an authentication message.
///
/// # Errors
/// - [`SignatureError::MissingCredential`] when neither credential form is complete
/// - [`SignatureError::InvalidPrivateKey`] when the private key cannot be loaded
/// - [`SignatureError::InvalidMessage`] when an input cannot be written into the message
/// - [`SignatureError::SignerFailure`] when the signer rejects or fails
pub async fn generate_signature(
    builder: &MessageBuilder,
    options: GenerateSignatureOptions,
) -> Result<GeneratedSignature, SignatureError> {
    let (address, signer): (String, Arc<dyn MessageSigner>) =
        match (options.signer, options.address, options.private_key) {
            (Some(signer), Some(address), _) => (address, signer),
            (_, _, Some(private_key)) => {
                let key = KeyManager::from_private_key(&private_key).map_err(|e| {
                    error!("Error generating signature: {}", e);
                    SignatureError::from(e)
                })?;
                (key.address(), Arc::new(key) as Arc<dyn MessageSigner>)
            }
            _ => return Err(SignatureError::MissingCredential),
        };

    let message_options = MessageOptions {
        address: address.clone(),
        action: Some(options.action.unwrap_or_else(|| DEFAULT_ACTION.to_string())),
        provider: Some(options.provider.unwrap_or_else(|| DEFAULT_PROVIDER.to_string())),
        traits: options.traits,
        verification_id: options.verification_id,
        domain: options.domain,
        uri: options.uri,
        chain_id: options.chain_id,
        statement: options.statement,
    };

    let built = builder.build(&message_options).map_err(|e| {
        error!("Error generating signature: {}", e);
        SignatureError::from(e)
    })?;
    debug!("Requesting signature from {} (nonce {})", address, built.nonce);

    let signature = signer.sign_message(&built.message).await.map_err(|e| {
        let failure = SignatureError::SignerFailure {
            message: e.to_string(),
        };
        if failure.is_user_rejection() {
            warn!("Signature request declined by {}", address);
        } else {
            error!("Error generating signature: {}", e);
        }
        failure
    })?;

    Ok(GeneratedSignature {
        address,
        message: built.message,
        signature,
        nonce: built.nonce,
    })
}

/// Signature for listing the signer's existing verifications.
pub async fn get_verifications_signature(
    builder: &MessageBuilder,
    private_key: &str,
) -> Result<GeneratedSignature, SignatureError> {
    generate_signature(
        builder,
        GenerateSignatureOptions {
            action: Some("get_verifications".to_string()),
            provider: Some(String::new()),
            ..GenerateSignatureOptions::with_private_key(private_key)
        },
    )
    .await
}

/// Signature for creating a verification URL with `provider`.
pub async fn verification_url_signature(
    builder: &MessageBuilder,
    private_key: &str,
    provider: &str,
) -> Result<GeneratedSignature, SignatureError> {
    generate_signature(
        builder,
        GenerateSignatureOptions {
            action: Some("create_verification_url".to_string()),
            provider: Some(provider.to_string()),
            ..GenerateSignatureOptions::with_private_key(private_key)
        },
    )
    .await
}

/// Signature requesting a verification token for `provider` under `traits`.
pub async fn verify_token_signature(
    builder: &MessageBuilder,
    private_key: &str,
    provider: &str,
    traits: TraitRequirements,
) -> Result<GeneratedSignature, SignatureError> {
    generate_signature(
        builder,
        GenerateSignatureOptions {
            action: Some("verify_token".to_string()),
            provider: Some(provider.to_string()),
            traits,
            ..GenerateSignatureOptions::with_private_key(private_key)
        },
    )
    .await
}
