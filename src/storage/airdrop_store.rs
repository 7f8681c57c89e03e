// src/storage/airdrop_store.rs
//! Airdrop claim registry.
//!
//! Holds one [`VerifiedUser`] per address. Addresses are keyed lower-cased so
//! checksummed and plain spellings of the same account collide.

use crate::models::verified_user::VerifiedUser;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Registry of airdrop claims.
pub trait AirdropStore: Send + Sync {
    /// Records a claim for `address`, or refreshes the token of an existing one.
    fn record(&self, address: &str, token: Option<String>) -> VerifiedUser;

    /// All claims, newest first.
    fn list(&self) -> Vec<VerifiedUser>;

    fn find(&self, address: &str) -> Option<VerifiedUser>;

    /// Removes the claim for `address`. Returns whether one existed.
    fn delete(&self, address: &str) -> bool;
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    users: HashMap<String, VerifiedUser>,
}

/// In-memory [`AirdropStore`]. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryAirdropStore {
    registry: Mutex<Registry>,
}

impl InMemoryAirdropStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`AirdropStore::record`] with an explicit clock.
    pub fn record_at(&self, address: &str, token: Option<String>, now: DateTime<Utc>) -> VerifiedUser {
        let key = address.to_lowercase();
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = registry.users.get_mut(&key) {
            if token.is_some() {
                existing.token = token;
            }
            existing.updated_at = now;
            return existing.clone();
        }

        registry.next_id += 1;
        let user = VerifiedUser {
            id: registry.next_id,
            address: key.clone(),
            token,
            created_at: now,
            updated_at: now,
        };
        registry.users.insert(key, user.clone());
        user
    }

    pub fn count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .len()
    }
}

impl AirdropStore for InMemoryAirdropStore {
    fn record(&self, address: &str, token: Option<String>) -> VerifiedUser {
        self.record_at(address, token, Utc::now())
    }

    fn list(&self) -> Vec<VerifiedUser> {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let mut users: Vec<VerifiedUser> = registry.users.values().cloned().collect();
        // Ties on the timestamp fall back to insertion order
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        users
    }

    fn find(&self, address: &str) -> Option<VerifiedUser> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .get(&address.to_lowercase())
            .cloned()
    }

    fn delete(&self, address: &str) -> bool {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .remove(&address.to_lowercase())
            .is_some()
    }
}
