//! The single ingestion endpoint every event goes through.

use audiencelab_common::{Clock, DeviceProbe, HttpStatusCode, SdkError};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{ApiClient, WEBHOOK_PATH};
use crate::dates::{envelope_timestamp, format_utc_offset, timezone_offset_minutes};
use crate::retention::RetentionState;
use crate::storage::{keys, Storage};

/// Standard body of a `/webhook` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookEnvelope<P> {
    #[serde(rename = "type")]
    pub event_type: String,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub created_at: String,
    #[serde(rename = "creativeToken")]
    pub creative_token: Option<String>,
    pub device_name: String,
    pub device_model: String,
    pub os_system: String,
    /// `±HH:MM`, see [`format_utc_offset`].
    pub utc_offset: String,
    /// Latest retention day, empty until one has been computed.
    pub retention_day: String,
    pub payload: P,
}

#[derive(Clone)]
pub struct WebhookDispatcher {
    storage: Storage,
    probe: Arc<dyn DeviceProbe>,
    clock: Arc<dyn Clock>,
}

impl WebhookDispatcher {
    pub fn new(storage: Storage, probe: Arc<dyn DeviceProbe>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            probe,
            clock,
        }
    }

    /// Wraps `payload` in an envelope using the current time, device snapshot
    /// and the token and retention day as stored right now.
    pub async fn build_envelope<P: Serialize>(
        &self,
        event_type: &str,
        payload: P,
    ) -> WebhookEnvelope<P> {
        let now = self.clock.now();
        let metrics = self.probe.collect().await;
        let retention_day = RetentionState::load(&self.storage)
            .await
            .retention_day
            .map(|day| day.to_string())
            .unwrap_or_default();
        let creative_token = self.storage.get_item(keys::CREATIVE_TOKEN).await;

        WebhookEnvelope {
            event_type: event_type.to_string(),
            created_at: envelope_timestamp(&now),
            creative_token,
            device_name: metrics.device_name,
            device_model: metrics.device_model,
            os_system: metrics.os_version,
            utc_offset: format_utc_offset(timezone_offset_minutes(&now)),
            retention_day,
            payload,
        }
    }

    /// Sends one event and returns the server's response body.
    pub async fn send<P: Serialize + Send + Sync>(
        &self,
        api: &ApiClient,
        event_type: &str,
        payload: &P,
    ) -> Result<Value, SdkError> {
        let envelope = self.build_envelope(event_type, payload).await;
        debug!("Dispatching {} event", event_type);
        api.post_json(WEBHOOK_PATH, &envelope).await.inspect_err(|err| {
            warn!(
                status = err.status_code(),
                "Webhook {} failed: {}", event_type, err
            );
        })
    }
}
