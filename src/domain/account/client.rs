//! Accounts sub-client — CRUD, stats and connection checks.

use crate::client::DashboardClient;
use crate::domain::account::{Account, AccountStats, ConnectionTest, CreateAccount, UpdateAccount};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::AccountId;

/// Sub-client for trading-account operations.
pub struct Accounts<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> Accounts<'a> {
    pub async fn list(&self) -> Result<Vec<Account>, SdkError> {
        let url = self.client.http.url("/accounts");
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    pub async fn get(&self, id: &AccountId) -> Result<Account, SdkError> {
        let url = self.account_url(id, "");
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    /// Create an account. The request is validated locally first.
    pub async fn create(&self, req: &CreateAccount) -> Result<Account, SdkError> {
        req.validate().map_err(SdkError::Validation)?;
        let url = self.client.http.url("/accounts");
        let account: Account = self
            .client
            .http
            .post(&url, Some(req), RetryPolicy::None)
            .await?;
        tracing::info!(account = %account.id, "account created");
        Ok(account)
    }

    pub async fn update(&self, id: &AccountId, req: &UpdateAccount) -> Result<Account, SdkError> {
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(SdkError::Validation(
                "account name must not be empty".to_string(),
            ));
        }
        let url = self.account_url(id, "");
        Ok(self
            .client
            .http
            .patch(&url, req, RetryPolicy::None)
            .await?)
    }

    pub async fn delete(&self, id: &AccountId) -> Result<(), SdkError> {
        let url = self.account_url(id, "");
        self.client
            .http
            .delete::<serde_json::Value>(&url, RetryPolicy::None)
            .await?;
        tracing::info!(account = %id, "account deleted");
        Ok(())
    }

    pub async fn stats(&self, id: &AccountId) -> Result<AccountStats, SdkError> {
        let url = self.account_url(id, "/stats");
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }

    /// Ask the backend to check the account's API token against the broker.
    pub async fn test_connection(&self, id: &AccountId) -> Result<ConnectionTest, SdkError> {
        let url = self.account_url(id, "/test-connection");
        Ok(self
            .client
            .http
            .post(&url, None::<&()>, RetryPolicy::None)
            .await?)
    }

    fn account_url(&self, id: &AccountId, suffix: &str) -> String {
        self.client.http.url(&format!(
            "/accounts/{}{}",
            urlencoding::encode(id.as_str()),
            suffix
        ))
    }
}
