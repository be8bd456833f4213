//! HTTP client layer — `DashboardHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::DashboardHttp;
pub use retry::{RetryConfig, RetryPolicy};
