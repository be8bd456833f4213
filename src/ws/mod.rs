//! WebSocket layer — messages, subscriptions, events, listeners.
//!
//! Every frame, in both directions, is a JSON envelope:
//!
//! ```json
//! { "event": "tick:received", "data": { ... }, "timestamp": "2024-03-01T12:00:00Z" }
//! ```
//!
//! The transport (`ws-native` feature → `tokio-tungstenite`) lives in
//! `native.rs`. This module defines the shared message/event types.

pub mod listeners;
pub mod subscriptions;

#[cfg(feature = "ws-native")]
pub mod native;

use crate::domain::connection::SystemHealth;
use crate::domain::notification::NewNotification;
use crate::domain::trading::wire::{BalanceUpdate, LiveTick, TradeExecuted};
use crate::shared::{AccountId, SessionId, Symbol};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub use listeners::{ListenerId, Listeners};
pub use subscriptions::{SubscribeParams, Subscription, UnsubscribeParams};

/// Event names used on the wire and by [`Listeners`].
pub mod events {
    pub const TICK_RECEIVED: &str = "tick:received";
    pub const TRADE_EXECUTED: &str = "trade:executed";
    pub const BALANCE_UPDATED: &str = "balance:updated";
    pub const SYSTEM_HEALTH: &str = "system:health";
    pub const NOTIFICATION: &str = "notification";
    pub const PONG: &str = "pong";
    pub const ERROR: &str = "error";

    pub const SUBSCRIBE_SYMBOL: &str = "subscribe:symbol";
    pub const UNSUBSCRIBE_SYMBOL: &str = "unsubscribe:symbol";
    pub const SUBSCRIBE_SESSION: &str = "subscribe:session";
    pub const UNSUBSCRIBE_SESSION: &str = "unsubscribe:session";
    pub const GET_SYSTEM_HEALTH: &str = "get:system:health";
    pub const PING: &str = "ping";

    pub const CONNECTION_ESTABLISHED: &str = "connection:established";
    pub const CONNECTION_LOST: &str = "connection:lost";
    pub const CONNECTION_RECONNECTING: &str = "connection:reconnecting";
    pub const CONNECTION_FAILED: &str = "connection:failed";
    pub const CONNECTION_ERROR: &str = "connection:error";
}

// ─── Outbound messages ───────────────────────────────────────────────────────

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOut {
    Subscribe(SubscribeParams),
    Unsubscribe(UnsubscribeParams),
    GetSystemHealth,
    Ping,
}

impl MessageOut {
    pub fn subscribe_symbol(symbol: Symbol, account_id: Option<AccountId>) -> Self {
        Self::Subscribe(SubscribeParams::Symbol { symbol, account_id })
    }

    pub fn unsubscribe_symbol(symbol: Symbol) -> Self {
        Self::Unsubscribe(UnsubscribeParams::Symbol { symbol })
    }

    pub fn subscribe_session(session_id: SessionId) -> Self {
        Self::Subscribe(SubscribeParams::Session { session_id })
    }

    pub fn unsubscribe_session(session_id: SessionId) -> Self {
        Self::Unsubscribe(UnsubscribeParams::Session { session_id })
    }

    /// The envelope's `event` field.
    pub fn event_name(&self) -> &'static str {
        match self {
            MessageOut::Subscribe(SubscribeParams::Symbol { .. }) => events::SUBSCRIBE_SYMBOL,
            MessageOut::Subscribe(SubscribeParams::Session { .. }) => events::SUBSCRIBE_SESSION,
            MessageOut::Unsubscribe(UnsubscribeParams::Symbol { .. }) => {
                events::UNSUBSCRIBE_SYMBOL
            }
            MessageOut::Unsubscribe(UnsubscribeParams::Session { .. }) => {
                events::UNSUBSCRIBE_SESSION
            }
            MessageOut::GetSystemHealth => events::GET_SYSTEM_HEALTH,
            MessageOut::Ping => events::PING,
        }
    }
}

impl Serialize for MessageOut {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_data = matches!(self, MessageOut::Subscribe(_) | MessageOut::Unsubscribe(_));
        let mut map = serializer.serialize_map(Some(if has_data { 2 } else { 1 }))?;
        map.serialize_entry("event", self.event_name())?;
        match self {
            MessageOut::Subscribe(params) => map.serialize_entry("data", params)?,
            MessageOut::Unsubscribe(params) => map.serialize_entry("data", params)?,
            MessageOut::GetSystemHealth | MessageOut::Ping => {}
        }
        map.end()
    }
}

// ─── Inbound messages ────────────────────────────────────────────────────────

/// Raw inbound frame before the payload is typed.
#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

/// Inbound message from the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Envelope")]
pub struct MessageIn {
    pub kind: Kind,
    pub timestamp: Option<DateTime<Utc>>,
}

/// The type of inbound WebSocket message.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Tick(LiveTick),
    TradeExecuted(TradeExecuted),
    BalanceUpdated(BalanceUpdate),
    SystemHealth(SystemHealth),
    Notification(NewNotification),
    Pong,
    Error(WsErrorPayload),
    /// An event this client has no type for; kept so listeners can still see it.
    Other {
        event: String,
        data: serde_json::Value,
    },
}

impl Kind {
    /// The envelope's `event` field.
    pub fn name(&self) -> &str {
        match self {
            Kind::Tick(_) => events::TICK_RECEIVED,
            Kind::TradeExecuted(_) => events::TRADE_EXECUTED,
            Kind::BalanceUpdated(_) => events::BALANCE_UPDATED,
            Kind::SystemHealth(_) => events::SYSTEM_HEALTH,
            Kind::Notification(_) => events::NOTIFICATION,
            Kind::Pong => events::PONG,
            Kind::Error(_) => events::ERROR,
            Kind::Other { event, .. } => event,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsErrorPayload {
    /// Server error code; string or numeric depending on the emitter.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

fn payload<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(data)
}

impl TryFrom<Envelope> for MessageIn {
    type Error = serde_json::Error;

    fn try_from(env: Envelope) -> Result<Self, Self::Error> {
        let kind = match env.event.as_str() {
            events::TICK_RECEIVED => Kind::Tick(payload(env.data)?),
            events::TRADE_EXECUTED => Kind::TradeExecuted(payload(env.data)?),
            events::BALANCE_UPDATED => Kind::BalanceUpdated(payload(env.data)?),
            events::SYSTEM_HEALTH => Kind::SystemHealth(payload(env.data)?),
            events::NOTIFICATION => Kind::Notification(payload(env.data)?),
            events::PONG => Kind::Pong,
            events::ERROR => Kind::Error(payload(env.data)?),
            _ => Kind::Other {
                event: env.event,
                data: env.data,
            },
        };
        Ok(MessageIn {
            kind,
            timestamp: env.timestamp,
        })
    }
}

// ─── WsEvent ─────────────────────────────────────────────────────────────────

/// High-level events emitted by the WS client to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum WsEvent {
    /// A parsed message from the server.
    Message(Kind),
    /// Connection established.
    Connected,
    /// Connection lost (may trigger reconnect).
    Disconnected { code: Option<u16>, reason: String },
    /// A reconnect attempt is about to start.
    Reconnecting { attempt: u32 },
    /// Reconnect attempts exhausted; the client has stopped.
    MaxReconnectReached,
    /// A connection, deserialization or protocol error.
    Error(String),
}

impl WsEvent {
    /// Name under which listeners for this event are registered.
    pub fn name(&self) -> &str {
        match self {
            WsEvent::Message(kind) => kind.name(),
            WsEvent::Connected => events::CONNECTION_ESTABLISHED,
            WsEvent::Disconnected { .. } => events::CONNECTION_LOST,
            WsEvent::Reconnecting { .. } => events::CONNECTION_RECONNECTING,
            WsEvent::MaxReconnectReached => events::CONNECTION_FAILED,
            WsEvent::Error(_) => events::CONNECTION_ERROR,
        }
    }
}

/// Connection state of the WS client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl From<u16> for ReadyState {
    fn from(v: u16) -> Self {
        match v {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}

/// Configuration for the WS client.
#[derive(Debug, Clone, PartialEq)]
pub struct WsConfig {
    pub url: String,
    pub reconnect: bool,
    pub max_reconnect_attempts: u32,
    pub base_reconnect_delay_ms: u32,
    pub ping_interval_ms: u32,
    pub pong_timeout_ms: u32,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: crate::network::DEFAULT_WS_URL.to_string(),
            reconnect: true,
            max_reconnect_attempts: 5,
            base_reconnect_delay_ms: 1000,
            ping_interval_ms: 25_000,
            pong_timeout_ms: 20_000,
        }
    }
}

impl WsConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::NotificationKind;
    use rust_decimal::Decimal;

    fn parse(json: &str) -> MessageIn {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_outbound_envelopes() {
        let msg = MessageOut::subscribe_symbol(Symbol::from("R_100"), Some(AccountId::from("a1")));
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            serde_json::json!({
                "event": "subscribe:symbol",
                "data": { "symbol": "R_100", "accountId": "a1" }
            })
        );
        assert_eq!(
            serde_json::to_value(MessageOut::unsubscribe_session(SessionId::from("s1"))).unwrap(),
            serde_json::json!({ "event": "unsubscribe:session", "data": { "sessionId": "s1" } })
        );
        assert_eq!(
            serde_json::to_string(&MessageOut::GetSystemHealth).unwrap(),
            r#"{"event":"get:system:health"}"#
        );
        assert_eq!(
            serde_json::to_string(&MessageOut::Ping).unwrap(),
            r#"{"event":"ping"}"#
        );
    }

    #[test]
    fn test_inbound_tick() {
        let msg = parse(
            r#"{"event":"tick:received","data":{"symbol":"R_100","quote":812.3,"epoch":1709294400,"lastDigit":3},"timestamp":"2024-03-01T12:00:00Z"}"#,
        );
        assert!(msg.timestamp.is_some());
        match msg.kind {
            Kind::Tick(tick) => {
                assert_eq!(tick.symbol.as_str(), "R_100");
                assert_eq!(tick.quote, Decimal::new(8123, 1));
            }
            other => panic!("expected tick, got {:?}", other),
        }
    }

    #[test]
    fn test_inbound_pong_without_data() {
        let msg = parse(r#"{"event":"pong"}"#);
        assert_eq!(msg.kind, Kind::Pong);
        assert!(msg.timestamp.is_none());
    }

    #[test]
    fn test_inbound_notification_and_error() {
        let msg = parse(
            r#"{"event":"notification","data":{"type":"info","title":"Hi","message":"there"}}"#,
        );
        assert!(matches!(msg.kind, Kind::Notification(ref n) if n.kind == NotificationKind::Info));

        let msg = parse(r#"{"event":"error","data":{"code":"BAD_SYMBOL","message":"unknown symbol"}}"#);
        match msg.kind {
            Kind::Error(e) => {
                assert_eq!(e.code, Some(serde_json::json!("BAD_SYMBOL")));
                assert_eq!(e.message, "unknown symbol");
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_inbound_error_with_numeric_code() {
        let msg = parse(r#"{"event":"error","data":{"code":42,"message":"x"}}"#);
        match msg.kind {
            Kind::Error(e) => {
                assert_eq!(e.code, Some(serde_json::json!(42)));
                assert_eq!(e.message, "x");
            }
            other => panic!("expected error, got {:?}", other),
        }

        let msg = parse(r#"{"event":"error","data":{"message":"no code"}}"#);
        assert!(matches!(msg.kind, Kind::Error(ref e) if e.code.is_none()));
    }

    #[test]
    fn test_inbound_unknown_event_is_kept() {
        let msg = parse(r#"{"event":"session:updated","data":{"id":"s1"}}"#);
        assert_eq!(msg.kind.name(), "session:updated");
        assert!(matches!(msg.kind, Kind::Other { ref data, .. } if data["id"] == "s1"));
    }

    #[test]
    fn test_inbound_bad_payload_is_error() {
        let r = serde_json::from_str::<MessageIn>(r#"{"event":"tick:received","data":{"symbol":1}}"#);
        assert!(r.is_err());
        let r = serde_json::from_str::<MessageIn>(r#"{"data":{}}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_event_names() {
        assert_eq!(WsEvent::Connected.name(), "connection:established");
        assert_eq!(
            WsEvent::Disconnected {
                code: None,
                reason: String::new()
            }
            .name(),
            "connection:lost"
        );
        assert_eq!(WsEvent::Reconnecting { attempt: 1 }.name(), "connection:reconnecting");
        assert_eq!(WsEvent::MaxReconnectReached.name(), "connection:failed");
        assert_eq!(WsEvent::Error("x".into()).name(), "connection:error");
        assert_eq!(WsEvent::Message(Kind::Pong).name(), "pong");
    }

    #[test]
    fn test_ws_config_defaults() {
        let c = WsConfig::default();
        assert!(c.reconnect);
        assert_eq!(c.max_reconnect_attempts, 5);
        assert_eq!(c.base_reconnect_delay_ms, 1000);
        assert_eq!(c.ping_interval_ms, 25_000);
        assert_eq!(c.pong_timeout_ms, 20_000);
        assert_eq!(c.url, crate::network::DEFAULT_WS_URL);
    }

    #[test]
    fn test_ready_state_from_u16() {
        assert_eq!(ReadyState::from(ReadyState::Open as u16), ReadyState::Open);
        assert_eq!(ReadyState::from(42), ReadyState::Closed);
    }
}
