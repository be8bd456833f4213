//! Trading sub-client — start/stop commands, sessions, trades, config, stats.

use crate::client::DashboardClient;
use crate::domain::trading::{
    CommandAck, Trade, TradingConfig, TradingConfigPatch, TradingSession, TradingStats,
    DEFAULT_STATS_PERIOD, DEFAULT_TRADES_LIMIT,
};
use crate::error::SdkError;
use crate::http::client::query_string;
use crate::http::RetryPolicy;
use crate::shared::{AccountId, Symbol};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartTradingBody<'b> {
    account_id: &'b AccountId,
    symbols: &'b [Symbol],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopTradingBody<'b> {
    account_id: &'b AccountId,
}

/// Sub-client for trading operations.
pub struct Trading<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> Trading<'a> {
    // ── Commands ─────────────────────────────────────────────────────────

    /// Start trading `symbols` on an account. Not retried.
    pub async fn start(
        &self,
        account_id: &AccountId,
        symbols: &[Symbol],
    ) -> Result<CommandAck, SdkError> {
        if symbols.is_empty() {
            return Err(SdkError::Validation(
                "at least one symbol is required to start trading".to_string(),
            ));
        }
        let url = self.client.http.url("/trading/start");
        let body = StartTradingBody {
            account_id,
            symbols,
        };
        tracing::info!(account = %account_id, symbols = symbols.len(), "start trading");
        Ok(self
            .client
            .http
            .post(&url, Some(&body), RetryPolicy::None)
            .await?)
    }

    /// Stop trading on an account. Not retried.
    pub async fn stop(&self, account_id: &AccountId) -> Result<CommandAck, SdkError> {
        let url = self.client.http.url("/trading/stop");
        tracing::info!(account = %account_id, "stop trading");
        Ok(self
            .client
            .http
            .post(&url, Some(&StopTradingBody { account_id }), RetryPolicy::None)
            .await?)
    }

    pub async fn start_all(&self) -> Result<CommandAck, SdkError> {
        let url = self.client.http.url("/trading/start-all");
        Ok(self
            .client
            .http
            .post(&url, None::<&()>, RetryPolicy::None)
            .await?)
    }

    pub async fn stop_all(&self) -> Result<CommandAck, SdkError> {
        let url = self.client.http.url("/trading/stop-all");
        Ok(self
            .client
            .http
            .post(&url, None::<&()>, RetryPolicy::None)
            .await?)
    }

    // ── Sessions ─────────────────────────────────────────────────────────

    pub async fn active_sessions(&self) -> Result<Vec<TradingSession>, SdkError> {
        let url = self.client.http.url("/trading/sessions/active");
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    /// Past sessions, optionally for a single account.
    pub async fn session_history(
        &self,
        account_id: Option<&AccountId>,
    ) -> Result<Vec<TradingSession>, SdkError> {
        let url = format!(
            "{}{}",
            self.client.http.url("/trading/sessions/history"),
            query_string(&[("accountId", account_id.map(|a| a.to_string()))])
        );
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    // ── Trades ───────────────────────────────────────────────────────────

    /// Recent trades, newest first. `limit` defaults to 50.
    pub async fn trades(
        &self,
        account_id: Option<&AccountId>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, SdkError> {
        let url = format!(
            "{}{}",
            self.client.http.url("/trading/trades"),
            query_string(&[
                ("accountId", account_id.map(|a| a.to_string())),
                (
                    "limit",
                    Some(limit.unwrap_or(DEFAULT_TRADES_LIMIT).to_string())
                ),
            ])
        );
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    /// Trades for one account within an optional date range.
    pub async fn trade_history(
        &self,
        account_id: &AccountId,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Trade>, SdkError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(SdkError::Validation(format!(
                    "start date {} is after end date {}",
                    s, e
                )));
            }
        }
        let iso = |d: DateTime<Utc>| d.to_rfc3339_opts(SecondsFormat::Millis, true);
        let url = format!(
            "{}{}",
            self.client.http.url(&format!(
                "/trading/accounts/{}/trades",
                urlencoding::encode(account_id.as_str())
            )),
            query_string(&[("startDate", start.map(iso)), ("endDate", end.map(iso))])
        );
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    // ── Configuration ────────────────────────────────────────────────────

    pub async fn config(
        &self,
        account_id: &AccountId,
        symbol: &Symbol,
    ) -> Result<TradingConfig, SdkError> {
        let url = self.config_url(account_id, symbol);
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    pub async fn update_config(
        &self,
        account_id: &AccountId,
        symbol: &Symbol,
        patch: &TradingConfigPatch,
    ) -> Result<TradingConfig, SdkError> {
        let url = self.config_url(account_id, symbol);
        Ok(self
            .client
            .http
            .patch(&url, patch, RetryPolicy::None)
            .await?)
    }

    fn config_url(&self, account_id: &AccountId, symbol: &Symbol) -> String {
        self.client.http.url(&format!(
            "/trading/config/{}/{}",
            urlencoding::encode(account_id.as_str()),
            urlencoding::encode(symbol.as_str())
        ))
    }

    // ── Statistics ───────────────────────────────────────────────────────

    /// Account statistics over `period` (defaults to `"7d"`).
    pub async fn stats(
        &self,
        account_id: &AccountId,
        period: Option<&str>,
    ) -> Result<TradingStats, SdkError> {
        let url = format!(
            "{}{}",
            self.client.http.url(&format!(
                "/trading/stats/{}",
                urlencoding::encode(account_id.as_str())
            )),
            query_string(&[(
                "period",
                Some(period.unwrap_or(DEFAULT_STATS_PERIOD).to_string())
            )])
        );
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    /// Backend-wide statistics. The shape is not fixed, so it stays untyped.
    pub async fn system_stats(&self) -> Result<serde_json::Value, SdkError> {
        let url = self.client.http.url("/trading/stats/system");
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_body_shape() {
        let account = AccountId::from("acc_1");
        let symbols = [Symbol::from("R_100"), Symbol::from("R_50")];
        let body = StartTradingBody {
            account_id: &account,
            symbols: &symbols,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "accountId": "acc_1", "symbols": ["R_100", "R_50"] })
        );
    }

    #[tokio::test]
    async fn test_start_requires_symbols() {
        let client = DashboardClient::builder().build().unwrap();
        let err = client
            .trading()
            .start(&AccountId::from("acc_1"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_trade_history_rejects_inverted_range() {
        let client = DashboardClient::builder().build().unwrap();
        let end = Utc::now();
        let start = end + chrono::Duration::days(1);
        let err = client
            .trading()
            .trade_history(&AccountId::from("acc_1"), Some(start), Some(end))
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[test]
    fn test_config_url_encodes_segments() {
        let client = DashboardClient::builder()
            .base_url("http://localhost:3000/api")
            .build()
            .unwrap();
        let url = client
            .trading()
            .config_url(&AccountId::from("acc 1"), &Symbol::from("R_100"));
        assert_eq!(url, "http://localhost:3000/api/trading/config/acc%201/R_100");
    }
}
