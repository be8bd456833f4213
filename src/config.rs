//! Dashboard configuration loaded from environment variables.
//!
//! All settings come from `DASHBOARD_*` environment variables (or a `.env`
//! file via `dotenvy`). Missing or unparsable numeric and boolean values fall
//! back to defaults; malformed URLs are rejected.

use crate::error::SdkError;
use crate::network::{DEFAULT_API_URL, DEFAULT_WS_URL};
use std::time::Duration;
use url::Url;

/// Top-level client configuration.
///
/// Loaded once at startup via [`DashboardConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// REST API base URL (e.g. `http://localhost:3000/api`).
    pub api_url: String,

    /// WebSocket URL (e.g. `ws://localhost:3000/trading`).
    pub ws_url: String,

    /// Bearer token injected into every REST request.
    pub auth_token: Option<String>,

    /// Display name, used in log lines and the CLI banner.
    pub app_name: String,

    /// Master switch for the real-time connection.
    pub enable_websockets: bool,

    /// Whether state changes raise client-side notifications.
    pub enable_notifications: bool,

    /// Default `tracing` filter directive for the binary.
    pub log_level: String,

    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            auth_token: None,
            app_name: "Deriv Trading Dashboard".to_string(),
            enable_websockets: true,
            enable_notifications: true,
            log_level: "info".to_string(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file first.
    pub fn from_env() -> Result<Self, SdkError> {
        Self::from_env_with(&[])
    }

    /// Like [`from_env`](Self::from_env), but `overrides` take precedence
    /// over the environment and go through the same validation.
    pub fn from_env_with(overrides: &[(&str, String)]) -> Result<Self, SdkError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| {
            overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .or_else(|| std::env::var(key).ok())
        })
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SdkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("DASHBOARD_API_URL").unwrap_or(defaults.api_url);
        check_url("DASHBOARD_API_URL", &api_url, API_SCHEMES)?;

        let ws_url = lookup("DASHBOARD_WS_URL").unwrap_or(defaults.ws_url);
        check_url("DASHBOARD_WS_URL", &ws_url, WS_SCHEMES)?;

        let auth_token = lookup("DASHBOARD_AUTH_TOKEN").filter(|t| !t.trim().is_empty());

        let app_name = lookup("DASHBOARD_APP_NAME").unwrap_or(defaults.app_name);
        let enable_websockets = parse_bool(
            lookup("DASHBOARD_ENABLE_WEBSOCKETS"),
            defaults.enable_websockets,
        );
        let enable_notifications = parse_bool(
            lookup("DASHBOARD_ENABLE_NOTIFICATIONS"),
            defaults.enable_notifications,
        );
        let log_level = lookup("DASHBOARD_LOG_LEVEL").unwrap_or(defaults.log_level);
        let http_timeout = Duration::from_secs(parse_or(
            lookup("DASHBOARD_HTTP_TIMEOUT_SECS"),
            defaults.http_timeout.as_secs(),
        ));

        Ok(Self {
            api_url,
            ws_url,
            auth_token,
            app_name,
            enable_websockets,
            enable_notifications,
            log_level,
            http_timeout,
        })
    }
}

const API_SCHEMES: &[&str] = &["http", "https"];
const WS_SCHEMES: &[&str] = &["ws", "wss"];

/// Rejects anything that is not an absolute URL with a host and one of
/// `schemes`.
fn check_url(key: &str, url: &str, schemes: &[&str]) -> Result<(), SdkError> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| SdkError::Config(format!("{} is not a valid URL ({}): {:?}", key, e, url)))?;
    if !schemes.contains(&parsed.scheme()) {
        return Err(SdkError::Config(format!(
            "{} must use one of {:?}, got {:?}",
            key, schemes, url
        )));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(SdkError::Config(format!("{} has no host: {:?}", key, url)));
    }
    Ok(())
}

/// Parses `value` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Accepts `"true"`, `"1"`, `"false"`, `"0"` (case-insensitive).
fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.enable_websockets);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DASHBOARD_API_URL", "https://dash.example.com/api"),
            ("DASHBOARD_WS_URL", "wss://dash.example.com/trading"),
            ("DASHBOARD_AUTH_TOKEN", "tok"),
            ("DASHBOARD_ENABLE_NOTIFICATIONS", "0"),
            ("DASHBOARD_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://dash.example.com/api");
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert!(!config.enable_notifications);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DASHBOARD_ENABLE_WEBSOCKETS", "maybe"),
            ("DASHBOARD_HTTP_TIMEOUT_SECS", "soon"),
            ("DASHBOARD_AUTH_TOKEN", "  "),
        ]))
        .unwrap();
        assert!(config.enable_websockets);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_bad_scheme_rejected() {
        let err = DashboardConfig::from_lookup(lookup_from(&[(
            "DASHBOARD_WS_URL",
            "http://localhost:3000/trading",
        )]))
        .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_unparsable_url_rejected() {
        for bad in ["https:// not a url", "http://", "localhost:3000/api"] {
            let err = DashboardConfig::from_lookup(lookup_from(&[("DASHBOARD_API_URL", bad)]))
                .unwrap_err();
            assert!(matches!(err, SdkError::Config(_)), "{:?} accepted", bad);
        }
    }

    #[test]
    fn test_short_valid_urls_accepted() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DASHBOARD_API_URL", "http://x"),
            ("DASHBOARD_WS_URL", "ws://x:1"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://x");
        assert_eq!(config.ws_url, "ws://x:1");
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = DashboardConfig::from_env_with(&[
            ("DASHBOARD_API_URL", "https://other.example.com/api".to_string()),
            ("DASHBOARD_WS_URL", "wss://other.example.com/trading".to_string()),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://other.example.com/api");

        let err = DashboardConfig::from_env_with(&[(
            "DASHBOARD_API_URL",
            "ftp://other.example.com".to_string(),
        )])
        .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
