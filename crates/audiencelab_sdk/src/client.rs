//! The SDK facade host applications talk to.

use audiencelab_common::{Clock, DeviceProbe, SdkError, SystemClock};
use audiencelab_config::SdkConfig;
use audiencelab_storage::{KeyValueStore, StoreFactory};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiKey};
use crate::device::SystemDeviceProbe;
use crate::events::{
    AdEvent, CustomEvent, CustomEventParams, PurchaseEvent, AD_EVENT_TYPE, CUSTOM_EVENT_TYPE,
    PURCHASE_EVENT_TYPE, RETENTION_EVENT_TYPE,
};
use crate::retention::RetentionTracker;
use crate::storage::Storage;
use crate::token::TokenCache;
use crate::totals::TotalValueTracker;
use crate::webhook::WebhookDispatcher;

/// Why no retention event was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Today's cycle already completed.
    AlreadyReportedToday,
    /// First run, or stored dates were unreadable.
    NothingToReport,
}

/// What happened to the retention event during [`AudienceLab::initialize`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsOutcome {
    /// Delivered; carries the server's response body.
    Sent(Value),
    Skipped(SkipReason),
    /// Delivery failed. The day is still marked done and will not be retried.
    Failed(String),
}

impl MetricsOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, MetricsOutcome::Sent(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializeOutcome {
    pub token: String,
    pub metrics: MetricsOutcome,
}

/// Builder for [`AudienceLab`]. Unset collaborators fall back to the
/// configured store, [`SystemDeviceProbe`] and [`SystemClock`].
pub struct AudienceLabBuilder {
    config: SdkConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    probe: Option<Arc<dyn DeviceProbe>>,
    clock: Option<Arc<dyn Clock>>,
}

impl AudienceLabBuilder {
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn device_probe(mut self, probe: Arc<dyn DeviceProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> AudienceLab {
        let store = self
            .store
            .unwrap_or_else(|| StoreFactory::new().from_storage_config(&self.config.storage));
        let probe = self.probe.unwrap_or_else(|| Arc::new(SystemDeviceProbe));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let storage = Storage::new(store);

        AudienceLab {
            tokens: TokenCache::new(storage.clone(), probe.clone(), clock.clone()),
            retention: RetentionTracker::new(storage.clone(), clock.clone()),
            webhooks: WebhookDispatcher::new(storage.clone(), probe, clock),
            totals: TotalValueTracker::new(storage.clone()),
            api: OnceCell::new(),
            storage,
            config: self.config,
        }
    }
}

/// An SDK client.
///
/// Holds the API key from [`initialize`](Self::initialize) on; every
/// network operation before that fails with [`SdkError::Config`].
pub struct AudienceLab {
    config: SdkConfig,
    storage: Storage,
    api: OnceCell<ApiClient>,
    tokens: TokenCache,
    retention: RetentionTracker,
    webhooks: WebhookDispatcher,
    totals: TotalValueTracker,
}

impl AudienceLab {
    pub fn builder(config: SdkConfig) -> AudienceLabBuilder {
        AudienceLabBuilder {
            config,
            store: None,
            probe: None,
            clock: None,
        }
    }

    /// Sets the API key, then fetches the creative token and runs today's
    /// retention cycle concurrently.
    ///
    /// Only a token failure fails initialization; retention problems are
    /// reported through [`InitializeOutcome::metrics`]. Calling it again with
    /// the same key is allowed, with a different key it is an error.
    pub async fn initialize(&self, api_key: &str) -> Result<InitializeOutcome, SdkError> {
        if api_key.is_empty() {
            return Err(SdkError::Config(
                "API key is required to initialize the SDK.".to_string(),
            ));
        }
        let api = self.install_api_key(api_key)?;
        info!("SDK initialized with API key successfully.");

        let (token, metrics) = tokio::join!(
            self.tokens.fetch_creative_token(api),
            self.send_user_metrics_with(api)
        );
        let token = token.inspect_err(|err| error!("Failed during initialization: {}", err))?;

        match &metrics {
            MetricsOutcome::Failed(reason) => warn!("Retention metrics not sent: {}", reason),
            other => info!("Retention metrics: {:?}", other),
        }
        Ok(InitializeOutcome { token, metrics })
    }

    fn install_api_key(&self, api_key: &str) -> Result<&ApiClient, SdkError> {
        let key = ApiKey::new(api_key)?;
        let api = self
            .api
            .get_or_try_init(|| ApiClient::new(&self.config, key.clone()))?;
        if api.api_key() != &key {
            return Err(SdkError::Config(
                "SDK already initialized with a different API key.".to_string(),
            ));
        }
        Ok(api)
    }

    fn api(&self) -> Result<&ApiClient, SdkError> {
        self.api.get().ok_or_else(|| {
            SdkError::Config("API key not set. Call initialize first.".to_string())
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.api.get().is_some()
    }

    /// Runs today's retention cycle and sends the result, if any.
    pub async fn send_user_metrics(&self) -> MetricsOutcome {
        match self.api() {
            Ok(api) => self.send_user_metrics_with(api).await,
            Err(err) => MetricsOutcome::Failed(err.to_string()),
        }
    }

    async fn send_user_metrics_with(&self, api: &ApiClient) -> MetricsOutcome {
        if self.retention.reported_today().await {
            return MetricsOutcome::Skipped(SkipReason::AlreadyReportedToday);
        }
        let Some(report) = self.retention.update_retention().await else {
            return MetricsOutcome::Skipped(SkipReason::NothingToReport);
        };
        match self.webhooks.send(api, RETENTION_EVENT_TYPE, &report).await {
            Ok(body) => MetricsOutcome::Sent(body),
            Err(err) => MetricsOutcome::Failed(err.to_string()),
        }
    }

    /// The creative token, fetched on first use and cached afterwards.
    pub async fn fetch_creative_token(&self) -> Result<String, SdkError> {
        let api = self.api()?;
        self.tokens.fetch_creative_token(api).await
    }

    pub async fn verify_token(&self, token: &str) -> Result<Value, SdkError> {
        self.api()?.verify_token(token).await
    }

    pub async fn check_data_collection_status(&self) -> Result<Value, SdkError> {
        self.api()?.check_data_collection_status().await
    }

    /// Reports a purchase. The payload carries the purchase total including
    /// `value`; the total is committed only once the server accepts it.
    pub async fn send_custom_purchase_event(
        &self,
        id: &str,
        name: &str,
        value: f64,
        currency: &str,
        status: &str,
    ) -> Result<Value, SdkError> {
        self.send_purchase(id, name, value, currency, status, None)
            .await
    }

    /// Like [`send_custom_purchase_event`](Self::send_custom_purchase_event),
    /// tagged with the store's transaction id.
    pub async fn send_custom_purchase_event_with_transaction(
        &self,
        id: &str,
        name: &str,
        value: f64,
        currency: &str,
        status: &str,
        tr_id: &str,
    ) -> Result<Value, SdkError> {
        self.send_purchase(id, name, value, currency, status, Some(tr_id))
            .await
    }

    async fn send_purchase(
        &self,
        id: &str,
        name: &str,
        value: f64,
        currency: &str,
        status: &str,
        tr_id: Option<&str>,
    ) -> Result<Value, SdkError> {
        let api = self.api()?;
        let event = PurchaseEvent {
            item_id: id.to_string(),
            item_name: name.to_string(),
            value,
            currency: currency.to_string(),
            status: status.to_string(),
            total_purchase_value: self.totals.projected_purchase_value(value).await,
            tr_id: tr_id.map(str::to_string),
        };
        let body = self.webhooks.send(api, PURCHASE_EVENT_TYPE, &event).await?;
        self.totals.add_to_total_purchase_value(value).await;
        Ok(body)
    }

    /// Reports an ad interaction. The payload carries the ad total including
    /// `value`; the total is committed only once the server accepts it.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_custom_ad_event(
        &self,
        ad_id: &str,
        name: &str,
        source: &str,
        watch_time: f64,
        reward: bool,
        media_source: &str,
        channel: &str,
        value: f64,
        currency: &str,
    ) -> Result<Value, SdkError> {
        let api = self.api()?;
        let event = AdEvent {
            ad_id: ad_id.to_string(),
            name: name.to_string(),
            source: source.to_string(),
            watch_time,
            reward,
            media_source: media_source.to_string(),
            channel: channel.to_string(),
            value,
            currency: currency.to_string(),
            total_ad_value: self.totals.projected_ad_value(value).await,
        };
        let body = self.webhooks.send(api, AD_EVENT_TYPE, &event).await?;
        self.totals.add_to_total_ad_value(value).await;
        Ok(body)
    }

    pub async fn send_custom_event(
        &self,
        event_name: &str,
        params: CustomEventParams,
    ) -> Result<Value, SdkError> {
        let api = self.api()?;
        let event = CustomEvent {
            event_name: event_name.to_string(),
            params,
        };
        self.webhooks.send(api, CUSTOM_EVENT_TYPE, &event).await
    }

    pub async fn total_ad_value(&self) -> f64 {
        self.totals.total_ad_value().await
    }

    pub async fn total_purchase_value(&self) -> f64 {
        self.totals.total_purchase_value().await
    }

    /// Drops the cached creative token so the next fetch asks the server.
    pub async fn clear_cached_token(&self) {
        self.tokens.clear().await;
    }

    /// Clears everything the SDK stored: token, retention state and totals.
    pub async fn reset(&self) {
        warn!("Clearing all AudienceLab storage");
        self.storage.clear().await;
    }

    pub fn retention(&self) -> &RetentionTracker {
        &self.retention
    }
}
