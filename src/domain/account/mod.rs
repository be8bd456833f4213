//! Account domain — configured trading identities managed server-side.

#[cfg(feature = "http")]
pub mod client;
pub mod state;

use crate::shared::{AccountId, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::AccountsState;

/// A trading account as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub api_token: String,
    pub currency: String,
    pub balance: Decimal,
    pub is_active: bool,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loss: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_trades: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss_percentage: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Server-computed summary fields.
    #[serde(default, rename = "todayPnL", skip_serializing_if = "Option::is_none")]
    pub today_pnl: Option<Decimal>,
    #[serde(default, rename = "totalPnL", skip_serializing_if = "Option::is_none")]
    pub total_pnl: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_trades: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_trade_time: Option<DateTime<Utc>>,
}

impl Account {
    /// API token with everything but the last four characters masked.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.api_token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

/// Request body for `POST /accounts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    pub name: String,
    pub api_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<Symbol>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loss: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_trades: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss_percentage: Option<f64>,
}

impl CreateAccount {
    pub fn new(name: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    /// Reject requests the backend would refuse anyway.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("account name must not be empty".to_string());
        }
        if self.api_token.trim().is_empty() {
            return Err("API token must not be empty".to_string());
        }
        if let Some(pct) = self.stop_loss_percentage {
            if !(0.0..=100.0).contains(&pct) {
                return Err(format!("stop loss percentage out of range: {}", pct));
            }
        }
        Ok(())
    }
}

/// Partial update body for `PATCH /accounts/{id}`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<Symbol>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_loss: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_trades: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Aggregated statistics for one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total_balance: Decimal,
    #[serde(rename = "todayPnL")]
    pub today_pnl: Decimal,
    pub total_trades: u32,
    pub win_rate: f64,
    pub active_trades: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_trade_time: Option<DateTime<Utc>>,
    pub profit_today: Decimal,
    pub loss_today: Decimal,
    pub trades_won: u32,
    pub trades_lost: u32,
    pub average_trade_amount: Decimal,
    pub max_drawdown: Decimal,
}

/// Point-in-time balance breakdown for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub balance: Decimal,
    pub currency: String,
    pub equity: Decimal,
    pub margin: Decimal,
    pub free_margin: Decimal,
    pub margin_level: f64,
    pub timestamp: DateTime<Utc>,
}

/// Result of `POST /accounts/{id}/test-connection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionTest {
    pub connected: bool,
    pub message: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use std::str::FromStr;

    pub fn account(id: &str, balance: &str, active: bool) -> Account {
        Account {
            id: AccountId::from(id),
            name: format!("Account {}", id),
            api_token: "tok_abcdef1234".to_string(),
            currency: "USD".to_string(),
            balance: Decimal::from_str(balance).unwrap(),
            is_active: active,
            symbols: vec![Symbol::from("R_100"), Symbol::from("R_50")],
            max_loss: None,
            max_trades: None,
            stop_loss_percentage: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            today_pnl: None,
            total_pnl: None,
            active_trades: None,
            last_trade_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserialize_camel_case() {
        let json = r#"{
            "id": "acc_1",
            "name": "Main",
            "apiToken": "secret1234",
            "currency": "USD",
            "balance": 1050.25,
            "isActive": true,
            "symbols": ["R_100"],
            "maxLoss": 50,
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-15T10:30:00Z",
            "todayPnL": -12.5
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.id.as_str(), "acc_1");
        assert_eq!(account.balance, Decimal::new(105025, 2));
        assert_eq!(account.max_loss, Some(Decimal::from(50)));
        assert_eq!(account.today_pnl, Some(Decimal::new(-125, 1)));
        assert!(account.total_pnl.is_none());
        assert_eq!(account.symbols, vec![Symbol::from("R_100")]);
    }

    #[test]
    fn test_masked_token() {
        let account = fixtures::account("a", "1", true);
        assert_eq!(account.masked_token(), "**********1234");
    }

    #[test]
    fn test_update_account_omits_unset_fields() {
        let patch = UpdateAccount {
            is_active: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "isActive": false }));
    }

    #[test]
    fn test_create_account_validation() {
        assert!(CreateAccount::new("Main", "tok").validate().is_ok());
        assert!(CreateAccount::new(" ", "tok").validate().is_err());
        assert!(CreateAccount::new("Main", "").validate().is_err());

        let mut req = CreateAccount::new("Main", "tok");
        req.stop_loss_percentage = Some(150.0);
        assert!(req.validate().is_err());
    }
}
