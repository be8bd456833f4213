//! REST-backed actions that keep the state containers in sync.
//!
//! Mutating actions record the error message in the owning container and
//! return it; `load_*` refreshers only log failures.

use super::Dashboard;
use crate::domain::account::{Account, AccountStats, CreateAccount, UpdateAccount};
use crate::domain::notification::NewNotification;
use crate::domain::trading::{CommandAck, TradingConfig, TradingConfigPatch};
use crate::error::SdkError;
use crate::shared::{AccountId, Symbol};
use futures_util::future::join_all;

impl Dashboard {
    // ── Accounts ─────────────────────────────────────────────────────────

    /// Fetch every account, then each account's stats concurrently.
    pub async fn load_accounts(&self) -> Result<(), SdkError> {
        {
            let mut st = self.accounts.write().await;
            st.loading = true;
            st.error = None;
        }

        let result = self.client.accounts().list().await;

        let ids: Vec<AccountId> = match result {
            Ok(accounts) => {
                let ids = accounts.iter().map(|a| a.id.clone()).collect();
                self.accounts.write().await.replace(accounts);
                ids
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load accounts");
                {
                    let mut st = self.accounts.write().await;
                    st.loading = false;
                    st.error = Some(e.to_string());
                }
                self.notify(NewNotification::error("Error", "Failed to load accounts"))
                    .await;
                return Err(e);
            }
        };

        join_all(ids.iter().map(|id| self.load_account_stats(id))).await;

        self.accounts.write().await.loading = false;
        tracing::info!(count = ids.len(), "accounts loaded");
        Ok(())
    }

    /// Refresh one account's stats. Failures are logged, not returned.
    pub async fn load_account_stats(&self, id: &AccountId) -> Option<AccountStats> {
        match self.client.accounts().stats(id).await {
            Ok(stats) => {
                self.accounts
                    .write()
                    .await
                    .set_stats(id.clone(), stats.clone());
                Some(stats)
            }
            Err(e) => {
                tracing::warn!(account = %id, error = %e, "failed to load account stats");
                None
            }
        }
    }

    pub async fn create_account(&self, req: &CreateAccount) -> Result<Account, SdkError> {
        self.accounts.write().await.loading = true;
        let result = self.client.accounts().create(req).await;
        let account = self.finish_account_action(result).await?;

        self.accounts.write().await.push(account.clone());
        self.notify(NewNotification::success(
            "Success",
            format!("Account \"{}\" created successfully", account.name),
        ))
        .await;
        Ok(account)
    }

    pub async fn update_account(
        &self,
        id: &AccountId,
        req: &UpdateAccount,
    ) -> Result<Account, SdkError> {
        self.accounts.write().await.loading = true;
        let result = self.client.accounts().update(id, req).await;
        let account = self.finish_account_action(result).await?;

        self.accounts.write().await.replace_one(account.clone());
        self.notify(NewNotification::success(
            "Success",
            format!("Account \"{}\" updated successfully", account.name),
        ))
        .await;
        Ok(account)
    }

    pub async fn delete_account(&self, id: &AccountId) -> Result<(), SdkError> {
        let result = self.client.accounts().delete(id).await;
        self.finish_account_action(result).await?;

        self.accounts.write().await.remove(id);
        self.notify(NewNotification::success(
            "Success",
            "Account deleted successfully",
        ))
        .await;
        Ok(())
    }

    async fn finish_account_action<T>(&self, result: Result<T, SdkError>) -> Result<T, SdkError> {
        let mut st = self.accounts.write().await;
        st.loading = false;
        match result {
            Ok(v) => Ok(v),
            Err(e) => {
                st.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ── Trading commands ─────────────────────────────────────────────────

    /// Start trading; on success reload active sessions.
    pub async fn start_trading(
        &self,
        account_id: &AccountId,
        symbols: &[Symbol],
    ) -> Result<CommandAck, SdkError> {
        self.begin_trading_action().await;
        let result = self.client.trading().start(account_id, symbols).await;
        let ack = self.finish_trading_action(result).await?;

        if ack.success {
            self.load_active_sessions().await;
            self.notify(NewNotification::success("Trading Started", ack.message.clone()))
                .await;
        } else {
            tracing::warn!(account = %account_id, message = %ack.message, "start trading rejected");
        }
        Ok(ack)
    }

    /// Stop trading; on success drop the account's sessions.
    pub async fn stop_trading(&self, account_id: &AccountId) -> Result<CommandAck, SdkError> {
        self.begin_trading_action().await;
        let result = self.client.trading().stop(account_id).await;
        let ack = self.finish_trading_action(result).await?;

        if ack.success {
            self.trading
                .write()
                .await
                .remove_account_sessions(account_id);
            self.notify(NewNotification::warning("Trading Stopped", ack.message.clone()))
                .await;
        } else {
            tracing::warn!(account = %account_id, message = %ack.message, "stop trading rejected");
        }
        Ok(ack)
    }

    pub async fn start_all_accounts(&self) -> Result<CommandAck, SdkError> {
        self.begin_trading_action().await;
        let result = self.client.trading().start_all().await;
        let ack = self.finish_trading_action(result).await?;
        if ack.success {
            self.load_active_sessions().await;
        }
        Ok(ack)
    }

    pub async fn stop_all_accounts(&self) -> Result<CommandAck, SdkError> {
        self.begin_trading_action().await;
        let result = self.client.trading().stop_all().await;
        let ack = self.finish_trading_action(result).await?;
        if ack.success {
            self.trading.write().await.clear_sessions();
        }
        Ok(ack)
    }

    async fn begin_trading_action(&self) {
        let mut st = self.trading.write().await;
        st.loading = true;
        st.error = None;
    }

    async fn finish_trading_action<T>(&self, result: Result<T, SdkError>) -> Result<T, SdkError> {
        let mut st = self.trading.write().await;
        st.loading = false;
        match result {
            Ok(v) => Ok(v),
            Err(e) => {
                st.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ── Trading refreshers ───────────────────────────────────────────────

    pub async fn load_active_sessions(&self) {
        match self.client.trading().active_sessions().await {
            Ok(sessions) => self.trading.write().await.replace_sessions(sessions),
            Err(e) => tracing::warn!(error = %e, "failed to load active sessions"),
        }
    }

    pub async fn load_recent_trades(&self, account_id: Option<&AccountId>, limit: Option<u32>) {
        match self.client.trading().trades(account_id, limit).await {
            Ok(trades) => self.trading.write().await.replace_trades(trades),
            Err(e) => tracing::warn!(error = %e, "failed to load recent trades"),
        }
    }

    pub async fn load_trading_stats(&self, account_id: &AccountId, period: Option<&str>) {
        match self.client.trading().stats(account_id, period).await {
            Ok(stats) => self
                .trading
                .write()
                .await
                .set_stats(account_id.clone(), stats),
            Err(e) => tracing::warn!(account = %account_id, error = %e, "failed to load trading stats"),
        }
    }

    pub async fn load_trading_config(&self, account_id: &AccountId, symbol: &Symbol) {
        match self.client.trading().config(account_id, symbol).await {
            Ok(config) => self
                .trading
                .write()
                .await
                .set_config(account_id.clone(), config),
            Err(e) => {
                tracing::warn!(account = %account_id, symbol = %symbol, error = %e, "failed to load trading config")
            }
        }
    }

    pub async fn update_trading_config(
        &self,
        account_id: &AccountId,
        symbol: &Symbol,
        patch: &TradingConfigPatch,
    ) -> Result<TradingConfig, SdkError> {
        let result = self
            .client
            .trading()
            .update_config(account_id, symbol, patch)
            .await;
        let config = self.finish_trading_action(result).await?;
        self.trading
            .write()
            .await
            .set_config(account_id.clone(), config.clone());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::dashboard;
    use super::*;

    // The test dashboard points at a closed port, so every request fails fast.

    #[tokio::test]
    async fn test_load_accounts_failure_sets_error_and_toast() {
        let d = dashboard();
        assert!(d.load_accounts().await.is_err());

        let st = d.accounts_state().read().await;
        assert!(!st.loading);
        assert!(st.error.is_some());
        drop(st);

        let ns = d.notifications().read().await;
        let n = ns.items().front().unwrap();
        assert_eq!(n.message, "Failed to load accounts");
    }

    #[tokio::test]
    async fn test_refreshers_swallow_errors() {
        let d = dashboard();
        d.load_active_sessions().await;
        d.load_recent_trades(None, None).await;
        d.load_trading_stats(&AccountId::from("a"), None).await;
        assert!(d.load_account_stats(&AccountId::from("a")).await.is_none());

        let st = d.trading_state().read().await;
        assert!(st.error.is_none());
        assert!(d.notifications().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_start_trading_failure_records_error() {
        let d = dashboard();
        let err = d
            .start_trading(&AccountId::from("a"), &[Symbol::from("R_100")])
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Http(_)));
        let st = d.trading_state().read().await;
        assert!(!st.loading);
        assert!(st.error.is_some());
    }

    #[tokio::test]
    async fn test_create_account_validation_error_recorded() {
        let d = dashboard();
        let err = d
            .create_account(&CreateAccount::new("", "tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
        let st = d.accounts_state().read().await;
        assert!(st.is_empty());
        assert!(st.error.is_some());
        assert!(!st.loading);
    }
}
