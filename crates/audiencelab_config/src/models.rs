// --- File: crates/audiencelab_config/src/models.rs ---

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://analytics.geeklab.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STORAGE_FILE: &str = "audiencelab-storage.json";

// --- Storage Config ---
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit.
    Memory,
    /// JSON file on disk; the native counterpart of browser local storage.
    #[default]
    File,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
        }
    }
}

// --- Unified SDK Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SdkConfig {
    /// Analytics API root, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for every HTTP request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // Only read by the agent binary. Library hosts pass the key to `initialize`.
    // Loaded via AUDIENCELAB__API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
            storage: StorageConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl SdkConfig {
    /// Configuration pointing at a custom API root, everything else default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_storage_path() -> String {
    DEFAULT_STORAGE_FILE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
