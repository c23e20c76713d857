// --- File: crates/audiencelab_common/src/http.rs ---
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use crate::error::{config_error, SdkError};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "geeklab-api-key";

/// Creates an HTTP client for the analytics API.
///
/// Every request made with it carries the JSON content type and the API key
/// header, and is bounded by `timeout_secs`.
pub fn create_client(api_key: &str, timeout_secs: u64) -> Result<Client, SdkError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    let mut key = header::HeaderValue::from_str(api_key)
        .map_err(|_| config_error("API key contains invalid characters."))?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(|err| config_error(format!("Failed to build HTTP client: {}", err)))
}

/// Translates a non-success status and its body into an [`SdkError`].
pub fn map_status(status: StatusCode, body: String) -> SdkError {
    match status.as_u16() {
        400 => SdkError::BadRequest,
        401 => SdkError::Unauthorized,
        404 => SdkError::NotFound(body),
        500 => SdkError::ServerError(body),
        other => SdkError::OtherHttp {
            status: other,
            body,
        },
    }
}
