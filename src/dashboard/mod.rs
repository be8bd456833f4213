//! The REST client, the state containers, and the glue between
//! them and the real-time event stream.
//!
//! Each container sits behind its own `async_lock::RwLock`; no method holds
//! more than one lock at a time, and no lock is held across a network call.
//!
//! - `actions.rs` — REST-backed account and trading actions
//! - `events.rs` — real-time event handling and subscription helpers
//! - `view.rs` — aggregate views and multi-step actions

mod actions;
mod events;
mod view;

pub use view::SystemStats;

use crate::client::DashboardClient;
use crate::config::DashboardConfig;
use crate::domain::account::AccountsState;
use crate::domain::connection::ConnectionState;
use crate::domain::notification::{NewNotification, Notifications};
use crate::domain::trading::TradingState;
use crate::error::SdkError;
use crate::ws::{ListenerId, Listeners, WsEvent};

use async_lock::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Application state for the trading dashboard.
///
/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    client: DashboardClient,
    accounts: Arc<RwLock<AccountsState>>,
    trading: Arc<RwLock<TradingState>>,
    connection: Arc<RwLock<ConnectionState>>,
    notifications: Arc<RwLock<Notifications>>,
    listeners: Arc<RwLock<Listeners>>,
    notifications_enabled: Arc<AtomicBool>,
}

impl Dashboard {
    pub fn new(client: DashboardClient) -> Self {
        Self {
            client,
            accounts: Arc::new(RwLock::new(AccountsState::new())),
            trading: Arc::new(RwLock::new(TradingState::default())),
            connection: Arc::new(RwLock::new(ConnectionState::new())),
            notifications: Arc::new(RwLock::new(Notifications::default())),
            listeners: Arc::new(RwLock::new(Listeners::new())),
            notifications_enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Build the client and dashboard from a loaded configuration.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, SdkError> {
        let client = crate::client::DashboardClientBuilder::from_config(config).build()?;
        let dashboard = Self::new(client);
        dashboard.set_notifications_enabled(config.enable_notifications);
        Ok(dashboard)
    }

    pub fn client(&self) -> &DashboardClient {
        &self.client
    }

    // ── State access ─────────────────────────────────────────────────────

    pub fn accounts_state(&self) -> &RwLock<AccountsState> {
        &self.accounts
    }

    pub fn trading_state(&self) -> &RwLock<TradingState> {
        &self.trading
    }

    pub fn connection_state(&self) -> &RwLock<ConnectionState> {
        &self.connection
    }

    pub fn notifications(&self) -> &RwLock<Notifications> {
        &self.notifications
    }

    // ── Notifications ────────────────────────────────────────────────────

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled.load(Ordering::Relaxed)
    }

    /// Turn toasts on or off. Existing notifications are kept.
    pub fn set_notifications_enabled(&self, enabled: bool) {
        self.notifications_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Record a notification. Returns its id, or `None` when disabled.
    pub async fn notify(&self, notification: NewNotification) -> Option<u64> {
        if !self.notifications_enabled() {
            tracing::trace!(title = %notification.title, "notification suppressed");
            return None;
        }
        tracing::debug!(
            kind = %notification.kind,
            title = %notification.title,
            "{}",
            notification.message
        );
        Some(self.notifications.write().await.add(notification))
    }

    // ── Listeners ────────────────────────────────────────────────────────

    /// Register a callback for an event name (see [`WsEvent::name`]).
    pub async fn on<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&WsEvent) + Send + Sync + 'static,
    {
        self.listeners.write().await.on(event, callback)
    }

    /// Remove one listener, or all listeners for `event` when `id` is `None`.
    pub async fn off(&self, event: &str, id: Option<ListenerId>) -> usize {
        self.listeners.write().await.off(event, id)
    }

    /// Invoke listeners for `event` without holding the registry lock, so
    /// callbacks may register or remove listeners themselves.
    async fn emit(&self, event: &WsEvent) {
        let callbacks = self.listeners.read().await.callbacks(event.name());
        for cb in callbacks {
            cb(event);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::dashboard;
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_notify_respects_toggle() {
        let d = dashboard();
        assert!(d.notify(NewNotification::info("a", "b")).await.is_some());
        d.set_notifications_enabled(false);
        assert!(d.notify(NewNotification::info("c", "d")).await.is_none());
        assert_eq!(d.notifications().read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_listeners_on_off() {
        let d = dashboard();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let id = d
            .on("connection:established", move |_| {
                h.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        d.emit(&WsEvent::Connected).await;
        assert_eq!(d.off("connection:established", Some(id)).await, 1);
        d.emit(&WsEvent::Connected).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_config_applies_notification_toggle() {
        let config = DashboardConfig {
            enable_notifications: false,
            ..DashboardConfig::default()
        };
        let d = Dashboard::from_config(&config).unwrap();
        assert!(!d.notifications_enabled());
    }
}
