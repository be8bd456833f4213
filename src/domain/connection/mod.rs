//! Connection domain — real-time link status and backend health.

#[cfg(feature = "http")]
pub mod client;
pub mod state;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use state::ConnectionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Down => write!(f, "down"),
        }
    }
}

/// Backend health report (`system:health` event and `GET /health`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    pub status: HealthStatus,
    /// Seconds since the backend started.
    pub uptime: f64,
    pub connected_accounts: u32,
    pub active_sessions: u32,
    pub memory_usage: f64,
    pub cpu_usage: f64,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of the real-time connection, for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub reconnect_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ping: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_deserialize() {
        let h: SystemHealth = serde_json::from_str(
            r#"{
                "status": "degraded",
                "uptime": 3600.5,
                "connectedAccounts": 3,
                "activeSessions": 2,
                "memoryUsage": 128.4,
                "cpuUsage": 12.5,
                "timestamp": "2024-03-01T12:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(h.status, HealthStatus::Degraded);
        assert_eq!(h.connected_accounts, 3);
        assert_eq!(h.status.to_string(), "degraded");
    }

    #[test]
    fn test_unknown_health_status_rejected() {
        let r = serde_json::from_str::<HealthStatus>(r#""sleepy""#);
        assert!(r.is_err());
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let s = ConnectionStatus {
            connected: true,
            reconnect_attempts: 2,
            last_ping: None,
        };
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            serde_json::json!({ "connected": true, "reconnectAttempts": 2 })
        );
    }
}
