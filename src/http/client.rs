//! Low-level HTTP client — `DashboardHttp`.
//!
//! Generic verb helpers with per-call retry policies. Endpoint URLs are built
//! by the domain sub-clients (`domain/<name>/client.rs`); this layer only
//! handles transport, auth, status mapping and response envelopes.

use crate::error::{ApiErrorBody, HttpError};
use crate::http::retry::{RetryConfig, RetryPolicy};

use async_lock::RwLock;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Low-level HTTP client for the dashboard REST API.
#[derive(Clone)]
pub struct DashboardHttp {
    base_url: String,
    client: Client,
    /// Bearer token. NEVER exposed publicly.
    auth_token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for DashboardHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardHttp")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DashboardHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Seed the bearer token at construction time.
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = Arc::new(RwLock::new(token));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path onto the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().await = token;
    }

    pub(crate) async fn has_auth_token(&self) -> bool {
        self.auth_token.read().await.is_some()
    }

    // ── Verbs ────────────────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, None::<&()>, retry)
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::POST, url, body, retry)
            .await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::PATCH, url, Some(body), retry)
            .await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::DELETE, url, None::<&()>, retry)
            .await
    }

    // ── Internals ────────────────────────────────────────────────────────

    async fn request_with_retry<T: DeserializeOwned, B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(&method, url, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, B>(&method, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let wait = match &e {
                        HttpError::ServerError { status, .. }
                            if config.retryable_statuses.contains(status) =>
                        {
                            Some(config.delay_for_attempt(attempt))
                        }
                        HttpError::RateLimited { retry_after_ms } => {
                            rate_limit_wait(*retry_after_ms, attempt, &config)
                        }
                        HttpError::Timeout => Some(config.delay_for_attempt(attempt)),
                        HttpError::Reqwest(re) if re.is_connect() || re.is_timeout() => {
                            Some(config.delay_for_attempt(attempt))
                        }
                        _ => None,
                    };

                    match wait {
                        Some(delay) if attempt < config.max_retries => {
                            tracing::debug!(
                                attempt = attempt + 1,
                                max = config.max_retries,
                                delay_ms = delay.as_millis() as u64,
                                "Retrying {} {}",
                                method,
                                url
                            );
                            futures_timer::Delay::new(delay).await;
                            last_error = Some(e);
                        }
                        _ => return Err(e),
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = self.auth_token.read().await.as_ref() {
            req = req.bearer_auth(token);
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;
        let status = resp.status();

        if status.is_success() {
            let bytes = resp.bytes().await?;
            return decode_body(&bytes);
        }

        let retry_after_ms = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status_code, "{} {} failed", method, url);

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(ApiErrorBody::message_from_body(
                &body_text,
            ))),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(ApiErrorBody::message_from_body(
                &body_text,
            ))),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

/// `Retry-After` in delta-seconds, as milliseconds. HTTP-dates are ignored.
pub(crate) fn parse_retry_after(value: &str) -> Option<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// How long to wait before retrying a 429.
///
/// Honors `Retry-After` when the server sends one, falling back to the
/// policy's backoff. A `Retry-After` beyond the policy's `max_delay` is not
/// retried; the caller gets the `RateLimited` error back instead.
pub(crate) fn rate_limit_wait(
    retry_after_ms: Option<u64>,
    attempt: u32,
    config: &RetryConfig,
) -> Option<Duration> {
    match retry_after_ms {
        Some(ms) => {
            let wait = Duration::from_millis(ms);
            (wait <= config.max_delay).then_some(wait)
        }
        None => Some(config.delay_for_attempt(attempt)),
    }
}

/// `{ success, data, message? }` wrapper some endpoints put around the payload.
#[derive(Deserialize)]
struct Wrapped {
    success: bool,
    data: serde_json::Value,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a 2xx body, unwrapping the `{success, data}` envelope if present.
///
/// An empty body decodes as JSON `null` so `()` responses work.
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HttpError> {
    let value: serde_json::Value = if bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(bytes).map_err(|e| HttpError::InvalidBody(e.to_string()))?
    };

    let is_wrapped = value
        .as_object()
        .is_some_and(|m| m.contains_key("success") && m.contains_key("data"));

    let payload = if is_wrapped {
        let wrapped: Wrapped =
            serde_json::from_value(value).map_err(|e| HttpError::InvalidBody(e.to_string()))?;
        if !wrapped.success {
            return Err(HttpError::BadRequest(
                wrapped
                    .message
                    .unwrap_or_else(|| "Request rejected by server".to_string()),
            ));
        }
        wrapped.data
    } else {
        value
    };

    serde_json::from_value(payload).map_err(|e| HttpError::InvalidBody(e.to_string()))
}

/// Build a `?k=v&…` query string, skipping unset parameters.
pub(crate) fn query_string(params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(k, v)| {
            v.as_ref()
                .map(|v| format!("{}={}", k, urlencoding::encode(v)))
        })
        .collect();
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}
