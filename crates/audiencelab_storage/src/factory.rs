//! Factory for creating stores from configuration

use audiencelab_config::{StorageBackend, StorageConfig};
use std::sync::Arc;
use tracing::debug;

use crate::file::FileStore;
use crate::memory::MemoryStore;
use crate::repository::KeyValueStore;

/// Builds the configured [`KeyValueStore`] backend.
#[derive(Debug, Clone, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create the store described by `config`.
    pub fn from_storage_config(&self, config: &StorageConfig) -> Arc<dyn KeyValueStore> {
        match config.backend {
            StorageBackend::Memory => {
                debug!("Using in-memory storage");
                Arc::new(MemoryStore::new())
            }
            StorageBackend::File => {
                debug!("Using file storage at {}", config.path);
                Arc::new(FileStore::new(&config.path))
            }
        }
    }
}
