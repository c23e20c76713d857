use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::repository::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// A store persisted as a single JSON object on disk.
///
/// The file is read on first access and rewritten in full on every mutation,
/// through a temporary file and a rename so a crash never leaves it half
/// written. A file that does not parse is moved to `<path>.corrupt` and the
/// store starts empty. Values written by this process are always visible to it even if
/// another process edits the file concurrently.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Option<Entries>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Entries::new()),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => Ok(entries),
                Err(err) => {
                    self.set_aside_corrupt(&err).await;
                    Ok(Entries::new())
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Storage file {} not found, starting empty", self.path.display());
                Ok(Entries::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Moves an unreadable file to `<path>.corrupt` so the store can start
    /// over empty instead of failing every call.
    async fn set_aside_corrupt(&self, err: &serde_json::Error) {
        let mut aside = self.path.clone().into_os_string();
        aside.push(".corrupt");
        warn!(
            "Storage file {} is not valid JSON ({}), moving it to {}",
            self.path.display(),
            err,
            Path::new(&aside).display()
        );
        if let Err(rename_err) = tokio::fs::rename(&self.path, &aside).await {
            warn!("Could not move {} aside: {}", self.path.display(), rename_err);
        }
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `mutate` to the loaded map and write it back.
    async fn update<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        if let Some(entries) = guard.as_mut() {
            mutate(entries);
            if let Err(err) = self.persist(entries).await {
                warn!("Failed to persist {}: {}", self.path.display(), err);
                // Drop the cache so the next access re-reads what is on disk.
                *guard = None;
                return Err(err);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(guard.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.update(move |entries| {
            entries.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.update(move |entries| {
            entries.remove(&key);
        })
        .await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.update(|entries| entries.clear()).await
    }
}
