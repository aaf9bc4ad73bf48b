//! Infrastructure layer: configuration and adapters for external services.
//!
//! Nothing here performs network IO itself; each external collaborator is a
//! trait with an in-memory implementation for tests/dev.

pub mod ai;
pub mod config;
pub mod credentials;
pub mod storage;

pub use config::{ConfigError, Settings};
pub use credentials::{CredentialCache, CredentialError, InMemorySecretStore, SecretStore};
pub use storage::{FeedDocument, InMemoryObjectStore, ObjectMeta, ObjectStore, StorageError, latest_feed_document};
