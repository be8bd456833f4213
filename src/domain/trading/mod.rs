//! Trading domain — sessions, trades, per-symbol configuration and statistics.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{AccountId, ContractType, SessionId, Symbol, TradeStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::TradingState;
pub use wire::{BalanceUpdate, LiveTick, TradeExecuted};

/// Stats period used when none is given.
pub const DEFAULT_STATS_PERIOD: &str = "7d";

/// Number of trades fetched by default for the recent-trades list.
pub const DEFAULT_TRADES_LIMIT: u32 = 50;

/// A period during which an account is actively trading a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSession {
    pub id: SessionId,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub is_active: bool,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub total_trades: u32,
    pub total_profit: Decimal,
    pub current_streak: i32,
    pub max_streak: i32,
    pub stop_loss_triggered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single contract placed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub contract_type: ContractType,
    pub amount: Decimal,
    pub profit: Decimal,
    pub status: TradeStatus,
    pub open_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_spot: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_spot: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_digit: Option<u8>,
}

/// Contract-selection strategy the backend runs for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    EvenOdd,
    RiseFall,
}

/// Per-account, per-symbol trading parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingConfig {
    pub symbol: Symbol,
    pub max_ticks: u32,
    pub initial_stake: Decimal,
    pub martingale_multiplier: Decimal,
    pub max_martingale_step: u32,
    pub stop_loss_amount: Decimal,
    pub take_profit_amount: Decimal,
    pub strategy: Strategy,
    pub enabled: bool,
}

/// Partial update body for `PATCH /trading/config/{account}/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_stake: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub martingale_multiplier: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_martingale_step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Performance statistics for an account over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingStats {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: f64,
    pub total_profit: Decimal,
    pub average_profit: Decimal,
    pub max_drawdown: Decimal,
    pub profit_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharpe_ratio: Option<f64>,
    pub max_consecutive_wins: u32,
    pub max_consecutive_losses: u32,
    pub average_win_amount: Decimal,
    pub average_loss_amount: Decimal,
}

/// Acknowledgement returned by the start/stop command endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
