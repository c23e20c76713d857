//! Best-effort access to the host's key-value store.
//!
//! Analytics must never take the host application down, so storage failures
//! stop here: they are logged and reads degrade to "absent".

use audiencelab_storage::KeyValueStore;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Keys the SDK persists under.
pub mod keys {
    pub const CREATIVE_TOKEN: &str = "creativeToken";
    pub const RETENTION_STATE: &str = "retentionState";
    pub const FIRST_LOGIN: &str = "firstLogin";
    pub const LAST_LOGIN: &str = "lastLogin";
    pub const RETENTION_DAY: &str = "retentionDay";
    pub const BACKFILL_DAY: &str = "backfillDay";
    pub const LAST_SENT_METRIC_DATE: &str = "lastSentMetricDate";
    pub const TOTAL_AD_VALUE: &str = "GeeklabSDK_TotalAdValue";
    pub const TOTAL_PURCHASE_VALUE: &str = "GeeklabSDK_TotalPurchaseValue";
}

#[derive(Clone)]
pub struct Storage {
    inner: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Reads a string value. Empty values and the serialized remains of an
    /// unresolved promise (`{"_h":0,"_i":0,...}`, left behind by older web
    /// builds) read as absent.
    pub async fn get_item(&self, key: &str) -> Option<String> {
        match self.inner.get(key).await {
            Ok(Some(value)) if value.is_empty() => None,
            Ok(Some(value)) if value.contains("\"_h\":0") && value.contains("\"_i\":0") => None,
            Ok(value) => value,
            Err(err) => {
                warn!("Storage error reading {}: {}", key, err);
                None
            }
        }
    }

    /// Reads and decodes a value that holds a JSON object or array.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_item(key).await?;
        if !(value.starts_with('{') || value.starts_with('[')) {
            return None;
        }
        match serde_json::from_str(&value) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("Ignoring undecodable value under {}: {}", key, err);
                None
            }
        }
    }

    pub async fn save_item(&self, key: &str, value: &str) {
        if let Err(err) = self.inner.set(key, value).await {
            warn!("Storage error writing {}: {}", key, err);
        }
    }

    pub async fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.save_item(key, &json).await,
            Err(err) => warn!("Failed to encode value for {}: {}", key, err),
        }
    }

    pub async fn remove_item(&self, key: &str) {
        if let Err(err) = self.inner.remove(key).await {
            warn!("Storage error removing {}: {}", key, err);
        }
    }

    pub async fn clear(&self) {
        if let Err(err) = self.inner.clear().await {
            warn!("Storage error clearing store: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiencelab_storage::{MemoryStore, StorageError};
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned("broken".into()))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned("broken".into()))
        }
        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned("broken".into()))
        }
        async fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Poisoned("broken".into()))
        }
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let storage = Storage::new(Arc::new(BrokenStore));
        storage.save_item("k", "v").await;
        storage.remove_item("k").await;
        storage.clear().await;
        assert_eq!(storage.get_item("k").await, None);
    }

    #[tokio::test]
    async fn empty_and_promise_leftovers_read_as_absent() {
        let store = MemoryStore::with_entries([
            ("empty", ""),
            ("promise", r#"{"_h":0,"_i":0,"_j":null,"_k":null}"#),
            ("plain", "abc"),
        ]);
        let storage = Storage::new(Arc::new(store));
        assert_eq!(storage.get_item("empty").await, None);
        assert_eq!(storage.get_item("promise").await, None);
        assert_eq!(storage.get_item("plain").await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn json_values_decode_only_when_they_look_like_json() {
        let store = MemoryStore::with_entries([
            ("list", r#"["a","b"]"#),
            ("text", "a,b"),
            ("broken", "{not json"),
        ]);
        let storage = Storage::new(Arc::new(store));
        assert_eq!(
            storage.get_json::<Vec<String>>("list").await,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(storage.get_json::<Vec<String>>("text").await, None);
        assert_eq!(storage.get_json::<Vec<String>>("broken").await, None);
    }
}
