//! Object-storage feed reader.
//!
//! A feed is a prefix under which time-stamped JSON documents are written; the
//! reader lists the prefix and loads the newest one.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("no objects under prefix {0:?}")]
    Empty(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("object {key} is not valid JSON: {reason}")]
    Malformed { key: String, reason: String },

    #[error("storage error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// Listing/reading side of an object store.
pub trait ObjectStore: Send + Sync {
    fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError>;

    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// A feed document with the metadata it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub body: JsonValue,
}

/// Load the most recently modified object under `prefix` as JSON.
///
/// Ties on `last_modified` go to the lexically greatest key.
pub fn latest_feed_document<S: ObjectStore + ?Sized>(
    store: &S,
    prefix: &str,
) -> Result<FeedDocument, StorageError> {
    let newest = store
        .list(prefix)?
        .into_iter()
        .max_by(|a, b| {
            a.last_modified
                .cmp(&b.last_modified)
                .then_with(|| a.key.cmp(&b.key))
        })
        .ok_or_else(|| StorageError::Empty(prefix.to_string()))?;

    let bytes = store.read(&newest.key)?;
    let body = serde_json::from_slice(&bytes).map_err(|e| StorageError::Malformed {
        key: newest.key.clone(),
        reason: e.to_string(),
    })?;

    debug!(key = %newest.key, modified = %newest.last_modified, "loaded feed document");
    Ok(FeedDocument {
        key: newest.key,
        last_modified: newest.last_modified,
        body,
    })
}

/// In-memory object store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<String, (DateTime<Utc>, Vec<u8>)>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: impl Into<String>, last_modified: DateTime<Utc>, body: impl Into<Vec<u8>>) {
        if let Ok(mut objects) = self.objects.write() {
            objects.insert(key.into(), (last_modified, body.into()));
        }
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StorageError::Backend("object map poisoned".to_string()))?;
        Ok(objects
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, (modified, _))| ObjectMeta {
                key: k.clone(),
                last_modified: *modified,
            })
            .collect())
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| StorageError::Backend("object map poisoned".to_string()))?;
        objects
            .get(key)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}
