//! Conversions from wire payloads to domain types.

use super::wire::TradeExecuted;
use super::Trade;
use crate::shared::TradeStatus;

impl From<TradeExecuted> for Trade {
    fn from(t: TradeExecuted) -> Self {
        Self {
            id: t.contract_id.clone(),
            account_id: t.account_id,
            symbol: t.symbol,
            contract_type: t.contract_type,
            amount: t.amount,
            profit: t.profit.unwrap_or_default(),
            status: TradeStatus::Pending,
            open_time: t.timestamp.unwrap_or_else(chrono::Utc::now),
            close_time: None,
            contract_id: Some(t.contract_id),
            transaction_id: t.transaction_id,
            entry_spot: None,
            exit_spot: None,
            last_digit: None,
        }
    }
}
