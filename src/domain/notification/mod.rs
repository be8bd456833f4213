//! Notifications — client-side toasts raised by actions and real-time events.

pub mod state;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use state::Notifications;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    /// How long a toast of this kind stays visible by default, in ms.
    pub fn default_duration_ms(&self) -> u64 {
        match self {
            NotificationKind::Success | NotificationKind::Info => 5_000,
            NotificationKind::Error => 8_000,
            NotificationKind::Warning => 6_000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification as stored in [`Notifications`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Auto-dismiss delay in ms; `0` keeps the toast until removed.
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub persistent: bool,
}

impl Notification {
    /// Whether the toast should have been dismissed by `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.persistent || self.duration == 0 {
            return false;
        }
        let age = now.signed_duration_since(self.timestamp);
        age.num_milliseconds() >= i64::try_from(self.duration).unwrap_or(i64::MAX)
    }
}

/// A notification before it is given an id and timestamp.
///
/// Also the shape of `notification` events pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub persistent: bool,
}

impl NewNotification {
    /// A notification with the kind's default duration.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            duration: Some(kind.default_duration_ms()),
            persistent: false,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration = Some(ms);
        self
    }

    /// Keep the toast until it is removed explicitly.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_builder_default_durations() {
        assert_eq!(NewNotification::success("a", "b").duration, Some(5_000));
        assert_eq!(NewNotification::error("a", "b").duration, Some(8_000));
        assert_eq!(NewNotification::warning("a", "b").duration, Some(6_000));
        assert_eq!(NewNotification::info("a", "b").duration, Some(5_000));
        assert_eq!(
            NewNotification::info("a", "b").with_duration(100).duration,
            Some(100)
        );
    }

    #[test]
    fn test_server_notification_deserialize() {
        let n: NewNotification = serde_json::from_str(
            r#"{"type":"warning","title":"Stop loss","message":"Stop loss hit on R_100"}"#,
        )
        .unwrap();
        assert_eq!(n.kind, NotificationKind::Warning);
        assert_eq!(n.duration, None);
        assert!(!n.persistent);
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let mut n = Notification {
            id: 1,
            kind: NotificationKind::Info,
            title: "t".into(),
            message: "m".into(),
            duration: 5_000,
            timestamp: now,
            read: false,
            persistent: false,
        };
        assert!(!n.is_expired(now + Duration::milliseconds(4_999)));
        assert!(n.is_expired(now + Duration::milliseconds(5_000)));
        n.persistent = true;
        assert!(!n.is_expired(now + Duration::hours(1)));
        n.persistent = false;
        n.duration = 0;
        assert!(!n.is_expired(now + Duration::hours(1)));
    }

    #[test]
    fn test_huge_duration_never_expires_early() {
        let now = Utc::now();
        let n = Notification {
            id: 1,
            kind: NotificationKind::Info,
            title: "t".into(),
            message: "m".into(),
            duration: u64::MAX,
            timestamp: now,
            read: false,
            persistent: false,
        };
        assert!(!n.is_expired(now));
        assert!(!n.is_expired(now + Duration::days(365)));
    }
}
