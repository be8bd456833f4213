//! Aggregate views over the state containers and multi-step actions.

use super::Dashboard;
use crate::domain::trading::CommandAck;
use crate::error::SdkError;
use crate::shared::AccountId;
use rust_decimal::Decimal;
use serde::Serialize;

/// Dashboard-wide totals shown in the header cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_accounts: usize,
    pub active_accounts: usize,
    pub total_balance: Decimal,
    pub active_sessions: usize,
    pub total_profit: Decimal,
    pub total_trades: u64,
}

impl Dashboard {
    pub async fn system_stats(&self) -> SystemStats {
        let (total_accounts, active_accounts, total_balance) = {
            let st = self.accounts.read().await;
            (st.count(), st.active().count(), st.total_balance())
        };
        let st = self.trading.read().await;
        SystemStats {
            total_accounts,
            active_accounts,
            total_balance,
            active_sessions: st.active_sessions_count(),
            total_profit: st.total_profit(),
            total_trades: st.total_active_trades(),
        }
    }

    /// Stop an account that has running sessions, or start one that has
    /// none on its configured symbols. The account's `is_active` flag
    /// follows a successful call.
    pub async fn toggle_account_trading(&self, id: &AccountId) -> Result<CommandAck, SdkError> {
        let symbols = {
            let st = self.accounts.read().await;
            let account = st
                .get(id)
                .ok_or_else(|| SdkError::Validation(format!("unknown account: {}", id)))?;
            account.symbols.clone()
        };
        let was_trading = self.trading.read().await.is_account_trading(id);

        let ack = if was_trading {
            self.stop_trading(id).await?
        } else {
            self.start_trading(id, &symbols).await?
        };

        if ack.success {
            self.accounts.write().await.set_active(id, !was_trading);
        }
        Ok(ack)
    }

    pub async fn start_all(&self) -> Result<CommandAck, SdkError> {
        let ack = self.start_all_accounts().await?;
        if ack.success {
            self.accounts.write().await.set_all_active(true);
        }
        Ok(ack)
    }

    pub async fn stop_all(&self) -> Result<CommandAck, SdkError> {
        let ack = self.stop_all_accounts().await?;
        if ack.success {
            self.accounts.write().await.set_all_active(false);
        }
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::dashboard;
    use super::*;
    use crate::domain::account::fixtures::account;
    use crate::domain::trading::fixtures::session;

    #[tokio::test]
    async fn test_system_stats_aggregates_state() {
        let d = dashboard();
        d.accounts_state().write().await.replace(vec![
            account("a", "100.50", true),
            account("b", "20", false),
            account("c", "0.25", true),
        ]);
        d.trading_state()
            .write()
            .await
            .replace_sessions(vec![session("s1", "a", 10, 3), session("s2", "c", 4, -1)]);

        let stats = d.system_stats().await;
        assert_eq!(stats.total_accounts, 3);
        assert_eq!(stats.active_accounts, 2);
        assert_eq!(stats.total_balance, Decimal::new(12075, 2));
        assert_eq!(stats.active_sessions, 2);
        assert_eq!(stats.total_profit, Decimal::from(2));
        assert_eq!(stats.total_trades, 14);
    }

    #[tokio::test]
    async fn test_system_stats_empty() {
        assert_eq!(dashboard().system_stats().await, SystemStats::default());
    }

    #[test]
    fn test_system_stats_serializes_camel_case() {
        let json = serde_json::to_value(SystemStats::default()).unwrap();
        assert!(json.get("totalAccounts").is_some());
        assert!(json.get("activeSessions").is_some());
    }

    #[tokio::test]
    async fn test_toggle_unknown_account() {
        let err = dashboard()
            .toggle_account_trading(&AccountId::from("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_toggle_failure_keeps_flag() {
        let d = dashboard();
        d.accounts_state()
            .write()
            .await
            .replace(vec![account("a", "1", true)]);
        assert!(d.toggle_account_trading(&AccountId::from("a")).await.is_err());
        assert!(
            d.accounts_state()
                .read()
                .await
                .get(&AccountId::from("a"))
                .unwrap()
                .is_active
        );
    }

    #[tokio::test]
    async fn test_stop_all_failure_keeps_flags() {
        let d = dashboard();
        d.accounts_state()
            .write()
            .await
            .replace(vec![account("a", "1", true), account("b", "1", true)]);
        assert!(d.stop_all().await.is_err());
        assert_eq!(d.accounts_state().read().await.active().count(), 2);
    }
}
