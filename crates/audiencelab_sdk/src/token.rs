//! Creative token acquisition and caching.
//!
//! The creative token identifies an installation. It is fetched once, by
//! posting a device-metrics snapshot, and read from the store ever after.

use audiencelab_common::{Clock, DeviceMetrics, DeviceProbe, SdkError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::{ApiClient, FETCH_TOKEN_PATH};
use crate::dates::iso_timestamp;
use crate::storage::{keys, Storage};

pub const DEVICE_METRICS_TYPE: &str = "device-metrics";

/// Body of a `/fetch-token` request.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: DeviceMetricsData,
    pub created_at: String,
}

/// Device snapshot in the shape the token endpoint expects.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceMetricsData {
    pub device_name: String,
    pub dpi: i64,
    pub gpu_rendered: String,
    pub gpu_vendor: String,
    pub gpu_version: String,
    pub gpu_content: Option<String>,
    pub window_height: u32,
    pub legacy_height: u32,
    pub window_width: u32,
    pub legacy_width: u32,
    pub installed_fonts: Vec<String>,
    pub low_battery_level: bool,
    pub os_system: String,
    pub device_model: String,
    pub timezone: String,
}

impl From<DeviceMetrics> for DeviceMetricsData {
    fn from(metrics: DeviceMetrics) -> Self {
        let dpi = if metrics.dpi.is_finite() {
            metrics.dpi.round() as i64
        } else {
            0
        };
        Self {
            device_name: metrics.device_name,
            dpi,
            gpu_rendered: metrics.gpu_renderer,
            gpu_vendor: metrics.gpu_vendor,
            gpu_version: metrics.gpu_version,
            gpu_content: None,
            window_height: metrics.native_height,
            legacy_height: metrics.legacy_height,
            window_width: metrics.native_width,
            legacy_width: metrics.legacy_width,
            installed_fonts: metrics.installed_fonts,
            low_battery_level: metrics.low_battery_level,
            os_system: metrics.os_version,
            device_model: metrics.device_model,
            timezone: metrics.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Obtains the creative token, from the store when cached.
///
/// Concurrent fetches are not coalesced: two calls racing on an empty cache
/// both hit the network and the last write wins.
#[derive(Clone)]
pub struct TokenCache {
    storage: Storage,
    probe: Arc<dyn DeviceProbe>,
    clock: Arc<dyn Clock>,
}

impl TokenCache {
    pub fn new(storage: Storage, probe: Arc<dyn DeviceProbe>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            probe,
            clock,
        }
    }

    /// The cached token, if any.
    pub async fn cached_token(&self) -> Option<String> {
        self.storage.get_item(keys::CREATIVE_TOKEN).await
    }

    /// Returns the cached token or fetches, caches and returns a new one.
    pub async fn fetch_creative_token(&self, api: &ApiClient) -> Result<String, SdkError> {
        if let Some(token) = self.cached_token().await {
            debug!("Using cached creative token");
            return Ok(token);
        }

        let payload = self.prepare_token_payload().await;
        let body = api.post_json(FETCH_TOKEN_PATH, &payload).await?;
        let TokenResponse { token } = serde_json::from_value(body)?;

        self.storage.save_item(keys::CREATIVE_TOKEN, &token).await;
        info!("Fetched and cached a new creative token");
        Ok(token)
    }

    /// Builds the `/fetch-token` body from a fresh device snapshot.
    pub async fn prepare_token_payload(&self) -> TokenRequest {
        let metrics = self.probe.collect().await;
        TokenRequest {
            kind: DEVICE_METRICS_TYPE,
            data: metrics.into(),
            created_at: iso_timestamp(&self.clock.now()),
        }
    }

    /// Forgets the cached token; the next fetch goes to the network.
    pub async fn clear(&self) {
        self.storage.remove_item(keys::CREATIVE_TOKEN).await;
    }
}
