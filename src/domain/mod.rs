//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Domain types matching the backend's JSON
//! - `wire.rs` — Payloads pushed over the real-time channel
//! - `convert.rs` — `From` conversions from wire payloads
//! - `state.rs` — State containers with update methods
//! - `client.rs` — Sub-client with HTTP methods

pub mod account;
pub mod connection;
pub mod notification;
pub mod trading;
