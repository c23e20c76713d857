// --- File: crates/audiencelab_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error type surfaced by every fallible SDK operation.
///
/// Display strings are part of the public contract: host applications show
/// them to developers and match on them, so they must stay stable.
#[derive(Error, Debug)]
pub enum SdkError {
    /// HTTP 400: the outgoing payload was rejected
    #[error("Bad request, data not formatted properly.")]
    BadRequest,

    /// HTTP 401: the API key was rejected
    #[error("API key is not valid.")]
    Unauthorized,

    /// HTTP 404, server message passed through
    #[error("Request failed: {0}")]
    NotFound(String),

    /// HTTP 500, server message passed through
    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other non-success status
    #[error("Error: {body}")]
    OtherHttp { status: u16, body: String },

    /// No HTTP response at all (DNS, connect, timeout, ...)
    #[error("Failed to communicate with the server.")]
    Transport(#[source] reqwest::Error),

    /// Missing or invalid configuration, raised before any network attempt
    #[error("{0}")]
    Config(String),

    /// A success response whose body did not have the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

/// Maps an error back to the HTTP status it stands for.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SdkError {
    fn status_code(&self) -> u16 {
        match self {
            SdkError::BadRequest => 400,
            SdkError::Unauthorized => 401,
            SdkError::NotFound(_) => 404,
            SdkError::ServerError(_) => 500,
            SdkError::OtherHttp { status, .. } => *status,
            SdkError::Transport(_) => 503,
            SdkError::Config(_) => 500,
            SdkError::InvalidResponse(_) => 502,
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::InvalidResponse(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> SdkError {
    SdkError::Config(message.to_string())
}
