//! Connection state container — driven by WebSocket lifecycle events.

use super::{ConnectionStatus, HealthStatus, SystemHealth};
use crate::shared::{SessionId, Symbol};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    connected: bool,
    reconnect_attempts: u32,
    last_ping: Option<DateTime<Utc>>,
    system_health: Option<SystemHealth>,
    subscribed_symbols: BTreeSet<Symbol>,
    subscribed_sessions: BTreeSet<SessionId>,
    error: Option<String>,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Getters ──────────────────────────────────────────────────────────

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    pub fn last_ping(&self) -> Option<DateTime<Utc>> {
        self.last_ping
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn system_health(&self) -> Option<&SystemHealth> {
        self.system_health.as_ref()
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            connected: self.connected,
            reconnect_attempts: self.reconnect_attempts,
            last_ping: self.last_ping,
        }
    }

    /// True only when the last health report said `healthy`.
    pub fn is_healthy(&self) -> bool {
        self.system_health
            .as_ref()
            .is_some_and(|h| h.status == HealthStatus::Healthy)
    }

    pub fn subscribed_symbols(&self) -> &BTreeSet<Symbol> {
        &self.subscribed_symbols
    }

    pub fn subscribed_sessions(&self) -> &BTreeSet<SessionId> {
        &self.subscribed_sessions
    }

    // ── Lifecycle transitions ────────────────────────────────────────────

    pub fn on_connected(&mut self, now: DateTime<Utc>) {
        self.connected = true;
        self.reconnect_attempts = 0;
        self.last_ping = Some(now);
        self.error = None;
    }

    pub fn on_disconnected(&mut self) {
        self.connected = false;
    }

    pub fn on_reconnecting(&mut self, attempt: u32) {
        self.connected = false;
        self.reconnect_attempts = attempt;
    }

    pub fn on_failed(&mut self, error: impl Into<String>) {
        self.connected = false;
        self.error = Some(error.into());
    }

    pub fn on_pong(&mut self, now: DateTime<Utc>) {
        self.last_ping = Some(now);
    }

    pub fn on_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn set_system_health(&mut self, health: SystemHealth) {
        self.system_health = Some(health);
    }

    // ── Subscriptions ────────────────────────────────────────────────────

    pub fn add_symbol(&mut self, symbol: Symbol) -> bool {
        self.subscribed_symbols.insert(symbol)
    }

    pub fn remove_symbol(&mut self, symbol: &Symbol) -> bool {
        self.subscribed_symbols.remove(symbol)
    }

    pub fn add_session(&mut self, session: SessionId) -> bool {
        self.subscribed_sessions.insert(session)
    }

    pub fn remove_session(&mut self, session: &SessionId) -> bool {
        self.subscribed_sessions.remove(session)
    }

    pub fn clear_subscriptions(&mut self) {
        self.subscribed_symbols.clear();
        self.subscribed_sessions.clear();
    }
}
