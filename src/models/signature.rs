// src/models/signature.rs
//! Signed authentication message bundle.

use serde::{Deserialize, Serialize};

/// A message together with its signature, as cached on the client and sent
/// to the verification backend.
///
/// # Fields
/// - `address`: Signer's account address
/// - `message`: Serialized [`AuthMessage`](crate::models::auth_message::AuthMessage) text
/// - `signature`: 0x-prefixed hex signature over `message`
/// - `nonce`: Nonce embedded in `message`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSignature {
    pub address: String,
    pub message: String,
    pub signature: String,
    pub nonce: String,
}
