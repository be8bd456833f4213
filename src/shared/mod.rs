//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw strings the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ─── AccountId ───────────────────────────────────────────────────────────────

/// Newtype for trading account identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for AccountId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AccountId(s.to_string()))
    }
}

// ─── SessionId ───────────────────────────────────────────────────────────────

/// Newtype for server-tracked trading session identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ─── Symbol ──────────────────────────────────────────────────────────────────

/// A tradable synthetic index symbol (e.g. `"R_100"`, `"1HZ10V"`).
///
/// Any string is accepted; [`Symbol::is_known`] checks it against the
/// symbols the backend is known to stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Volatility indices the backend streams ticks for.
    pub const KNOWN: [&'static str; 10] = [
        "R_10", "R_25", "R_50", "R_75", "R_100", "1HZ10V", "1HZ25V", "1HZ50V", "1HZ75V",
        "1HZ100V",
    ];

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }

    /// All known symbols, in backend order.
    pub fn known() -> Vec<Symbol> {
        Self::KNOWN.iter().map(|s| Symbol::from(*s)).collect()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Symbol(s.to_string()))
    }
}

// ─── ContractType ────────────────────────────────────────────────────────────

/// Digit / direction contract placed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractType {
    Even,
    Odd,
    Rise,
    Fall,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Even => "EVEN",
            Self::Odd => "ODD",
            Self::Rise => "RISE",
            Self::Fall => "FALL",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EVEN" => Ok(Self::Even),
            "ODD" => Ok(Self::Odd),
            "RISE" => Ok(Self::Rise),
            "FALL" => Ok(Self::Fall),
            other => Err(format!("unknown contract type: {}", other)),
        }
    }
}

// ─── TradeStatus ─────────────────────────────────────────────────────────────

/// Settlement status of a trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeStatus {
    #[default]
    Pending,
    Won,
    Lost,
}

impl TradeStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Won => write!(f, "WON"),
            Self::Lost => write!(f, "LOST"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_serde() {
        let id = AccountId::from("acc_1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"acc_1\"");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_symbol_known() {
        assert!(Symbol::from("R_100").is_known());
        assert!(Symbol::from("1HZ10V").is_known());
        assert!(!Symbol::from("BTCUSD").is_known());
        assert_eq!(Symbol::known().len(), 10);
    }

    #[test]
    fn test_contract_type_serde() {
        let ct: ContractType = serde_json::from_str("\"EVEN\"").unwrap();
        assert_eq!(ct, ContractType::Even);
        assert_eq!(serde_json::to_string(&ContractType::Fall).unwrap(), "\"FALL\"");
        assert_eq!("rise".parse::<ContractType>().unwrap(), ContractType::Rise);
        assert!("SIDEWAYS".parse::<ContractType>().is_err());
    }

    #[test]
    fn test_trade_status_serde() {
        let s: TradeStatus = serde_json::from_str("\"WON\"").unwrap();
        assert_eq!(s, TradeStatus::Won);
        assert!(s.is_settled());
        assert!(!TradeStatus::default().is_settled());
    }
}
