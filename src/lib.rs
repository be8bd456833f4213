//! # Deriv Dashboard SDK
//!
//! A Rust client for the Deriv trading dashboard backend: REST calls,
//! real-time WebSocket events, and the state containers a dashboard UI
//! renders from.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Newtypes, domain models, state containers, formatting (always available)
//! 2. **Config** — `DashboardConfig` loaded from `DASHBOARD_*` environment variables
//! 3. **HTTP API** — `DashboardHttp` with per-endpoint retry policies
//! 4. **WebSocket** — JSON event envelope, listeners, `tokio-tungstenite` transport
//! 5. **High-Level Client** — `DashboardClient` with nested sub-clients
//! 6. **Dashboard** — state containers wired to REST actions and real-time events
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deriv_dashboard::prelude::*;
//!
//! let dashboard = Dashboard::from_config(&DashboardConfig::from_env()?)?;
//! dashboard.load_accounts().await?;
//!
//! let mut ws = dashboard.client().ws_native()?;
//! ws.connect().await?;
//! dashboard.subscribe_to_symbol(&ws, Symbol::from("R_100"), None).await?;
//! dashboard.run(&ws).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and display formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Config ──────────────────────────────────────────────────────────

/// Environment-driven configuration.
pub mod config;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: WebSocket ───────────────────────────────────────────────────────

/// WebSocket client: messages, subscriptions, events, listeners.
pub mod ws;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `DashboardClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 6: Dashboard ───────────────────────────────────────────────────────

/// `Dashboard`: shared state plus the actions and event handling that keep it current.
#[cfg(feature = "http")]
pub mod dashboard;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{AccountId, ContractType, SessionId, Symbol, TradeStatus};

    // Domain types — account
    pub use crate::domain::account::{
        Account, AccountBalance, AccountStats, AccountsState, ConnectionTest, CreateAccount,
        UpdateAccount,
    };

    // Domain types — trading
    pub use crate::domain::trading::{
        BalanceUpdate, CommandAck, LiveTick, Strategy, Trade, TradeExecuted, TradingConfig,
        TradingConfigPatch, TradingSession, TradingState, TradingStats,
    };

    // Domain types — connection, notifications
    pub use crate::domain::connection::{
        ConnectionState, ConnectionStatus, HealthStatus, SystemHealth,
    };
    pub use crate::domain::notification::{
        NewNotification, Notification, NotificationKind, Notifications,
    };

    // Errors
    pub use crate::error::{HttpError, SdkError, WsError};

    // Config + network
    pub use crate::config::DashboardConfig;
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_WS_URL};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AccountsClient, DashboardClient, DashboardClientBuilder, SystemClient, TradingClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // WebSocket types
    pub use crate::ws::{
        Kind, ListenerId, Listeners, MessageIn, MessageOut, SubscribeParams, UnsubscribeParams,
        WsConfig, WsEvent,
    };
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::WsClient;

    // Dashboard
    #[cfg(feature = "http")]
    pub use crate::dashboard::{Dashboard, SystemStats};
}
