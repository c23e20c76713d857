//! HTTP access to the AudienceLab analytics API.

use audiencelab_common::{create_client, log_error, map_status, SdkError};
use audiencelab_config::SdkConfig;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

pub const FETCH_TOKEN_PATH: &str = "/fetch-token";
pub const VERIFY_TOKEN_PATH: &str = "/verify-token";
pub const DATA_COLLECTION_STATUS_PATH: &str = "/check-data-collection-status";
pub const WEBHOOK_PATH: &str = "/webhook";

/// The key identifying the host application to the API. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, SdkError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SdkError::Config("API key cannot be empty".to_string()));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Authenticated client for the analytics API.
///
/// Created once the API key is known; every request carries the key and the
/// JSON content type and is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    api_key: ApiKey,
}

impl ApiClient {
    pub fn new(config: &SdkConfig, api_key: ApiKey) -> Result<Self, SdkError> {
        let http = create_client(api_key.as_str(), config.timeout_secs)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POSTs `body` as JSON to `path` and returns the decoded response body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, SdkError> {
        debug!("POST {}", path);
        let result = self.http.post(self.url(path)).json(body).send().await;
        Self::handle(result).await
    }

    /// GETs `path` and returns the decoded response body.
    pub async fn get_json(&self, path: &str) -> Result<Value, SdkError> {
        debug!("GET {}", path);
        let result = self.http.get(self.url(path)).send().await;
        Self::handle(result).await
    }

    /// Asks the server whether `token` is a creative token it issued.
    pub async fn verify_token(&self, token: &str) -> Result<Value, SdkError> {
        self.post_json(VERIFY_TOKEN_PATH, &serde_json::json!({ "token": token }))
            .await
    }

    /// Asks the server whether data collection is enabled for this API key.
    pub async fn check_data_collection_status(&self) -> Result<Value, SdkError> {
        self.get_json(DATA_COLLECTION_STATUS_PATH).await
    }

    async fn handle(result: Result<Response, reqwest::Error>) -> Result<Value, SdkError> {
        let response = result.map_err(|err| {
            log_error(&err, "Unexpected error");
            SdkError::Transport(err)
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|err| {
            log_error(&err, "Unexpected error reading response body");
            SdkError::Transport(err)
        })?;

        if !status.is_success() {
            return Err(map_status(status, text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        // Non-JSON success bodies are passed through as plain strings.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}
