// src/wallet/signature_cache.rs
//! Short-lived cache for a signed authentication message.
//!
//! Re-signing on every verification attempt means a wallet prompt each time,
//! so the last [`GeneratedSignature`] is kept for five minutes. The backing
//! store is injected through [`KeyValueStore`]; [`MemoryStore`] is the
//! in-process implementation.
//!
//! Cached entries are treated as untrusted input: anything that fails to
//! parse is dropped and reported as a miss.

use crate::message::resources::{extract_resources, Resource};
use crate::models::signature::GeneratedSignature;
use crate::utils::crypto::same_address;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Storage key of the cached signature.
pub const CACHE_KEY: &str = "verify-signature-cache";

/// Cache lifetime in milliseconds.
pub const CACHE_TTL_MS: i64 = 5 * 60 * 1000;

/// String key-value storage, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn clear(&self, key: &str);
}

/// In-memory [`KeyValueStore`].
///
/// Thread-safe through an internal mutex; contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn clear(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Stored form: the signature bundle plus its expiry in epoch milliseconds.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedSignature {
    #[serde(flatten)]
    signature: GeneratedSignature,
    expires_at: i64,
}

/// Cache of the most recent signature.
pub struct SignatureCache<S> {
    store: S,
}

impl<S: KeyValueStore> SignatureCache<S> {
    pub fn new(store: S) -> Self {
        SignatureCache { store }
    }

    /// Caches `signature`, replacing any previous entry.
    pub fn set(&self, signature: &GeneratedSignature) {
        self.set_at(signature, now_ms());
    }

    pub fn set_at(&self, signature: &GeneratedSignature, now_ms: i64) {
        let cached = CachedSignature {
            signature: signature.clone(),
            expires_at: now_ms + CACHE_TTL_MS,
        };
        match serde_json::to_string(&cached) {
            Ok(json) => self.store.set(CACHE_KEY, json),
            Err(e) => log::error!("Error writing signature cache: {}", e),
        }
    }

    /// The cached signature, unless missing, expired or unreadable.
    pub fn get(&self) -> Option<GeneratedSignature> {
        self.get_at(now_ms())
    }

    pub fn get_at(&self, now_ms: i64) -> Option<GeneratedSignature> {
        let cached = self.read()?;
        if now_ms > cached.expires_at {
            self.clear();
            return None;
        }
        Some(cached.signature)
    }

    pub fn clear(&self) {
        self.store.clear(CACHE_KEY);
    }

    /// Whether there is no live entry.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_ms())
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.read() {
            Some(cached) => now_ms > cached.expires_at,
            None => true,
        }
    }

    /// Whether the cached signature can be reused for `address`, `action`
    /// and, when given, `provider`.
    ///
    /// The address comparison ignores case. Action and provider must appear
    /// as their own resources in the signed message.
    pub fn is_valid_for_address(&self, address: &str, action: &str, provider: Option<&str>) -> bool {
        self.is_valid_for_address_at(address, action, provider, now_ms())
    }

    pub fn is_valid_for_address_at(
        &self,
        address: &str,
        action: &str,
        provider: Option<&str>,
        now_ms: i64,
    ) -> bool {
        let Some(cached) = self.get_at(now_ms) else {
            return false;
        };
        if !same_address(&cached.address, address) {
            return false;
        }

        let resources = extract_resources(&cached.message).unwrap_or_default();
        if !declares(&resources, Resource::Action(action)) {
            return false;
        }
        match provider {
            Some(provider) if !provider.is_empty() => {
                declares(&resources, Resource::Provider(provider))
            }
            _ => true,
        }
    }

    fn read(&self) -> Option<CachedSignature> {
        let json = self.store.get(CACHE_KEY)?;
        match serde_json::from_str::<CachedSignature>(&json) {
            Ok(cached) => Some(cached),
            Err(e) => {
                log::error!("Error reading signature cache: {}", e);
                self.clear();
                None
            }
        }
    }
}

fn declares(resources: &[String], wanted: Resource<'_>) -> bool {
    resources
        .iter()
        .any(|resource| Resource::parse(resource) == wanted)
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
