//! System sub-client — backend health.

use crate::client::DashboardClient;
use crate::domain::connection::SystemHealth;
use crate::error::SdkError;
use crate::http::RetryPolicy;

pub struct System<'a> {
    pub(crate) client: &'a DashboardClient,
}

impl<'a> System<'a> {
    pub async fn health(&self) -> Result<SystemHealth, SdkError> {
        let url = self.client.http.url("/health");
        Ok(self
            .client
            .http
            .get(&url, RetryPolicy::Idempotent)
            .await?)
    }
}
