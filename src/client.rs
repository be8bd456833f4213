//! High-level client — `DashboardClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder and accessor methods.

use crate::config::DashboardConfig;
use crate::domain::account::client::Accounts;
use crate::domain::connection::client::System;
use crate::domain::trading::client::Trading;
use crate::error::SdkError;
use crate::http::DashboardHttp;
use crate::ws::WsConfig;

use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::account::client::Accounts as AccountsClient;
pub use crate::domain::connection::client::System as SystemClient;
pub use crate::domain::trading::client::Trading as TradingClient;

/// The primary entry point for the dashboard backend.
///
/// Provides nested sub-client accessors for each domain:
/// `client.accounts()`, `client.trading()`, `client.system()`.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    pub(crate) http: DashboardHttp,
    pub(crate) ws_config: WsConfig,
    pub(crate) realtime_enabled: bool,
}

impl DashboardClient {
    pub fn builder() -> DashboardClientBuilder {
        DashboardClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts { client: self }
    }

    pub fn trading(&self) -> Trading<'_> {
        Trading { client: self }
    }

    pub fn system(&self) -> System<'_> {
        System { client: self }
    }

    // ── Auth ─────────────────────────────────────────────────────────────

    /// Replace (or clear) the bearer token sent with every request.
    pub async fn set_auth_token(&self, token: Option<String>) {
        self.http.set_auth_token(token).await;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.http.has_auth_token().await
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    // ── Real-time ────────────────────────────────────────────────────────

    /// Get a WS config for creating a WebSocket connection.
    ///
    /// The WS client is not embedded in `DashboardClient`: its lifetime is
    /// owned by whatever drives the event loop (see `Dashboard::run`).
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    pub fn realtime_enabled(&self) -> bool {
        self.realtime_enabled
    }

    /// Create a new native WS client from the current config.
    ///
    /// Fails with `WsError::Disabled` when real-time updates are switched off.
    #[cfg(feature = "ws-native")]
    pub fn ws_native(&self) -> Result<crate::ws::native::WsClient, crate::error::WsError> {
        if !self.realtime_enabled {
            return Err(crate::error::WsError::Disabled);
        }
        Ok(crate::ws::native::WsClient::new(self.ws_config.clone()))
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DashboardClientBuilder {
    base_url: String,
    ws_url: String,
    auth_token: Option<String>,
    timeout: Duration,
    realtime_enabled: bool,
}

impl Default for DashboardClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            ws_url: crate::network::DEFAULT_WS_URL.to_string(),
            auth_token: None,
            timeout: Duration::from_secs(30),
            realtime_enabled: true,
        }
    }
}

impl DashboardClientBuilder {
    /// Seed every builder field from a loaded [`DashboardConfig`].
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            ws_url: config.ws_url.clone(),
            auth_token: config.auth_token.clone(),
            timeout: config.http_timeout,
            realtime_enabled: config.enable_websockets,
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn ws_url(mut self, url: &str) -> Self {
        self.ws_url = url.to_string();
        self
    }

    /// Pre-set the bearer token on construction.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn realtime(mut self, enabled: bool) -> Self {
        self.realtime_enabled = enabled;
        self
    }

    pub fn build(self) -> Result<DashboardClient, SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Config("base URL must not be empty".to_string()));
        }
        let http = DashboardHttp::new(&self.base_url, self.timeout)?.with_auth_token(self.auth_token);
        Ok(DashboardClient {
            http,
            ws_config: WsConfig::with_url(self.ws_url),
            realtime_enabled: self.realtime_enabled,
        })
    }
}
