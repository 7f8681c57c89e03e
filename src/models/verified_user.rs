// src/models/verified_user.rs
//! Airdrop claim record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One airdrop claim, recorded after the verification backend issued a token
/// for the address.
///
/// # Fields
/// - `id`: Monotonic record identifier
/// - `address`: Claiming address, stored lower-cased
/// - `token`: Token returned by the verification backend, if any
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedUser {
    pub id: u64,
    pub address: String,
    pub token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a claim, without the backend token.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary {
    pub id: u64,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VerifiedUser> for ClaimSummary {
    fn from(user: VerifiedUser) -> Self {
        ClaimSummary {
            id: user.id,
            address: user.address,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
