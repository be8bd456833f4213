//! Default endpoint constants for a locally running dashboard backend.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default WebSocket URL (the backend's `/trading` namespace).
pub const DEFAULT_WS_URL: &str = "ws://localhost:3000/trading";
