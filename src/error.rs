//! Unified SDK error types.

use serde::Deserialize;
use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("WebSocket error: {0}")]
    Ws(#[from] WsError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// WebSocket errors.
#[derive(Error, Debug)]
pub enum WsError {
    #[error("Not connected")]
    NotConnected,

    #[error("Real-time connection disabled by configuration")]
    Disabled,

    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Error body returned by the backend on non-2xx responses.
///
/// `message` is either a single string or a list of validation messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status_code: Option<u16>,
    pub message: ApiErrorMessage,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ApiErrorBody {
    /// Human-readable message; validation lists are joined with `"; "`.
    pub fn message(&self) -> String {
        match &self.message {
            ApiErrorMessage::One(m) => m.clone(),
            ApiErrorMessage::Many(ms) => ms.join("; "),
        }
    }

    /// Extract the message from a raw response body, falling back to the body itself.
    pub fn message_from_body(body: &str) -> String {
        serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.message())
            .unwrap_or_else(|_| body.to_string())
    }
}
