//! Wire payloads pushed over the real-time channel.

use crate::shared::{AccountId, ContractType, Symbol};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest price for a symbol (`tick:received`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTick {
    pub symbol: Symbol,
    pub quote: Decimal,
    /// Unix seconds.
    pub epoch: i64,
    pub last_digit: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LiveTick {
    /// Tick time: the explicit timestamp, else the epoch.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .or_else(|| Utc.timestamp_opt(self.epoch, 0).single())
    }

    pub fn is_even(&self) -> bool {
        self.last_digit % 2 == 0
    }
}

/// A contract the backend just bought (`trade:executed`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeExecuted {
    pub account_id: AccountId,
    pub symbol: Symbol,
    pub contract_type: ContractType,
    pub amount: Decimal,
    pub contract_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// New balance for an account (`balance:updated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub currency: String,
    pub change: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_without_timestamp_uses_epoch() {
        let tick: LiveTick = serde_json::from_str(
            r#"{"symbol":"R_100","quote":1234.56,"epoch":1709294400,"lastDigit":6}"#,
        )
        .unwrap();
        assert_eq!(tick.quote, Decimal::new(123456, 2));
        assert!(tick.is_even());
        assert_eq!(tick.time().unwrap().timestamp(), 1_709_294_400);
    }

    #[test]
    fn test_tick_prefers_explicit_timestamp() {
        let tick: LiveTick = serde_json::from_str(
            r#"{"symbol":"R_50","quote":1.5,"epoch":0,"lastDigit":5,"timestamp":"2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert!(!tick.is_even());
        assert_eq!(tick.time().unwrap().timestamp(), 1_709_294_400);
    }

    #[test]
    fn test_trade_executed_optional_fields() {
        let t: TradeExecuted = serde_json::from_str(
            r#"{"accountId":"acc_1","symbol":"R_10","contractType":"EVEN","amount":0.35,"contractId":"c1"}"#,
        )
        .unwrap();
        assert_eq!(t.contract_type, ContractType::Even);
        assert!(t.profit.is_none());
        assert!(t.timestamp.is_none());
    }

    #[test]
    fn test_balance_update_negative_change() {
        let b: BalanceUpdate = serde_json::from_str(
            r#"{"accountId":"acc_1","balance":99.65,"currency":"USD","change":-0.35,"timestamp":"2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(b.change, Decimal::new(-35, 2));
        assert!(b.change.is_sign_negative());
    }
}
