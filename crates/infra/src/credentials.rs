//! Credential cache over a secret store.
//!
//! The cache is an explicit object owned by whoever needs credentials: entries
//! are populated on first use, refetched once older than the TTL, and can be
//! invalidated by name (e.g. after the downstream service rejects a key).

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("secret store unavailable: {0}")]
    Unavailable(String),

    #[error("credential cache lock poisoned")]
    Poisoned,
}

/// Secret retrieval service: fetch a credential string by name.
pub trait SecretStore: Send + Sync {
    fn fetch(&self, name: &str) -> Result<String, CredentialError>;
}

#[derive(Debug, Clone)]
struct CachedSecret {
    value: String,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct CredentialCache<S: SecretStore> {
    store: S,
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedSecret>>,
}

impl<S: SecretStore> CredentialCache<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache whose TTL comes from `SPENDCAST_CREDENTIAL_TTL_SECS`.
    pub fn from_settings(store: S, settings: &Settings) -> Self {
        Self::new(store, settings.credential_ttl)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, name: &str) -> Result<String, CredentialError> {
        self.get_at(name, Utc::now())
    }

    /// Cached value for `name`, fetching when missing or expired at `now`.
    ///
    /// The store is called without holding the cache lock, so a slow secret
    /// never blocks lookups of other names. Concurrent misses on the same name
    /// may each fetch; the last write wins.
    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Result<String, CredentialError> {
        {
            let entries = self.entries.lock().map_err(|_| CredentialError::Poisoned)?;
            if let Some(cached) = entries.get(name) {
                if now - cached.fetched_at < self.ttl {
                    return Ok(cached.value.clone());
                }
                debug!(secret = name, "cached credential expired");
            }
        }

        let value = self.store.fetch(name).inspect_err(|e| {
            warn!(secret = name, error = %e, "credential fetch failed");
        })?;
        self.entries.lock().map_err(|_| CredentialError::Poisoned)?.insert(
            name.to_string(),
            CachedSecret {
                value: value.clone(),
                fetched_at: now,
            },
        );
        Ok(value)
    }

    /// Drop one entry; the next `get` refetches it.
    pub fn invalidate(&self, name: &str) -> Result<bool, CredentialError> {
        let mut entries = self.entries.lock().map_err(|_| CredentialError::Poisoned)?;
        Ok(entries.remove(name).is_some())
    }

    pub fn clear(&self) -> Result<(), CredentialError> {
        self.entries.lock().map_err(|_| CredentialError::Poisoned)?.clear();
        Ok(())
    }
}

/// In-memory secret store for tests/dev. Counts fetches per name.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: Mutex<HashMap<String, String>>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.put(name, value);
        self
    }

    /// Insert or rotate a secret.
    pub fn put(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut secrets) = self.secrets.lock() {
            secrets.insert(name.into(), value.into());
        }
    }

    pub fn fetch_count(&self, name: &str) -> usize {
        self.fetches
            .lock()
            .map(|f| f.get(name).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl SecretStore for InMemorySecretStore {
    fn fetch(&self, name: &str) -> Result<String, CredentialError> {
        if let Ok(mut fetches) = self.fetches.lock() {
            *fetches.entry(name.to_string()).or_insert(0) += 1;
        }
        self.secrets
            .lock()
            .map_err(|_| CredentialError::Unavailable("secret map poisoned".to_string()))?
            .get(name)
            .cloned()
            .ok_or_else(|| CredentialError::NotFound(name.to_string()))
    }
}
