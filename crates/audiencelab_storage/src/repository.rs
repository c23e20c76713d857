//! The key-value storage seam
//!
//! Backends implement [`KeyValueStore`]; the SDK only ever talks to this trait,
//! so hosts can plug in whatever durable storage their platform offers.

use async_trait::async_trait;

use crate::error::StorageError;

/// Durable string storage keyed by string.
///
/// Implementations are shared across tasks without external locking; a single
/// call must be atomic with respect to other calls on the same store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key.
    async fn clear(&self) -> Result<(), StorageError>;
}
