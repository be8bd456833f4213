//! Real-time event handling and subscription helpers.

use super::Dashboard;
use crate::domain::notification::NewNotification;
use crate::domain::trading::Trade;
use crate::shared::fmt::{format_currency, format_signed_currency};
use crate::ws::{Kind, WsEvent};
use chrono::Utc;

#[cfg(feature = "ws-native")]
use crate::error::WsError;
#[cfg(feature = "ws-native")]
use crate::shared::{AccountId, SessionId, Symbol};
#[cfg(feature = "ws-native")]
use crate::ws::native::WsClient;

/// Currency used for trade-executed toasts, which carry no currency.
const TRADE_CURRENCY: &str = "USD";

impl Dashboard {
    /// Apply one real-time event to state, raise any toasts, then run the
    /// listeners registered for the event's name.
    pub async fn handle_event(&self, event: &WsEvent) {
        match event {
            WsEvent::Connected => {
                self.connection.write().await.on_connected(Utc::now());
                tracing::info!("real-time connection established");
                self.notify(NewNotification::success(
                    "Connected",
                    "Real-time connection established",
                ))
                .await;
            }
            WsEvent::Disconnected { code, reason } => {
                self.connection.write().await.on_disconnected();
                tracing::warn!(code = ?code, reason = %reason, "real-time connection lost");
                self.notify(NewNotification::warning(
                    "Disconnected",
                    "Real-time connection lost",
                ))
                .await;
            }
            WsEvent::Reconnecting { attempt } => {
                self.connection.write().await.on_reconnecting(*attempt);
            }
            WsEvent::MaxReconnectReached => {
                self.connection.write().await.on_failed("Connection failed");
                self.notify(NewNotification::error(
                    "Connection Failed",
                    "Failed to establish real-time connection",
                ))
                .await;
            }
            WsEvent::Error(message) => {
                tracing::warn!("real-time error: {}", message);
                self.connection.write().await.on_error(message.clone());
            }
            WsEvent::Message(kind) => self.apply_message(kind).await,
        }

        self.emit(event).await;
    }

    async fn apply_message(&self, kind: &Kind) {
        match kind {
            Kind::Tick(tick) => {
                self.trading.write().await.update_live_tick(tick.clone());
            }
            Kind::TradeExecuted(executed) => {
                let message = format!(
                    "{} {} - {}",
                    executed.symbol,
                    executed.contract_type,
                    format_currency(&executed.amount, TRADE_CURRENCY)
                );
                self.trading
                    .write()
                    .await
                    .add_trade(Trade::from(executed.clone()));
                self.notify(NewNotification::info("Trade Executed", message))
                    .await;
            }
            Kind::BalanceUpdated(update) => {
                let applied = self.accounts.write().await.apply_balance_update(update);
                match applied {
                    Some(change) if !change.is_zero() => {
                        let message = format_signed_currency(&change, &update.currency);
                        let toast = if change.is_sign_positive() {
                            NewNotification::success("Balance Update", message)
                        } else {
                            NewNotification::error("Balance Update", message)
                        };
                        self.notify(toast).await;
                    }
                    Some(_) => {}
                    None => {
                        tracing::debug!(account = %update.account_id, "balance update for unknown account");
                    }
                }
            }
            Kind::SystemHealth(health) => {
                self.connection
                    .write()
                    .await
                    .set_system_health(health.clone());
            }
            Kind::Notification(n) => {
                self.notify(n.clone()).await;
            }
            Kind::Pong => {
                self.connection.write().await.on_pong(Utc::now());
            }
            Kind::Error(e) => {
                tracing::warn!(code = ?e.code, "server error: {}", e.message);
                self.connection.write().await.on_error(e.message.clone());
            }
            Kind::Other { event, .. } => {
                tracing::debug!(event = %event, "unhandled real-time event");
            }
        }
    }
}

#[cfg(feature = "ws-native")]
impl Dashboard {
    /// Pump `ws` events into [`Dashboard::handle_event`] until the stream
    /// ends, pruning expired notifications every second.
    pub async fn run(&self, ws: &WsClient) {
        use futures_util::StreamExt;

        let mut events = ws.events();
        let mut prune = tokio::time::interval(std::time::Duration::from_secs(1));

        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(event) => self.handle_event(&event).await,
                    None => break,
                },
                _ = prune.tick() => {
                    let removed = self.notifications.write().await.prune_expired(Utc::now());
                    if removed > 0 {
                        tracing::trace!(removed, "expired notifications pruned");
                    }
                }
            }
        }
    }

    pub async fn subscribe_to_symbol(
        &self,
        ws: &WsClient,
        symbol: Symbol,
        account_id: Option<AccountId>,
    ) -> Result<(), WsError> {
        ws.subscribe_symbol(symbol.clone(), account_id)?;
        self.connection.write().await.add_symbol(symbol);
        Ok(())
    }

    pub async fn unsubscribe_from_symbol(&self, ws: &WsClient, symbol: Symbol) -> Result<(), WsError> {
        ws.unsubscribe_symbol(symbol.clone())?;
        self.connection.write().await.remove_symbol(&symbol);
        Ok(())
    }

    pub async fn subscribe_to_session(&self, ws: &WsClient, session_id: SessionId) -> Result<(), WsError> {
        ws.subscribe_session(session_id.clone())?;
        self.connection.write().await.add_session(session_id);
        Ok(())
    }

    pub async fn unsubscribe_from_session(
        &self,
        ws: &WsClient,
        session_id: SessionId,
    ) -> Result<(), WsError> {
        ws.unsubscribe_session(session_id.clone())?;
        self.connection.write().await.remove_session(&session_id);
        Ok(())
    }

    pub fn request_system_health(&self, ws: &WsClient) -> Result<(), WsError> {
        ws.request_system_health()
    }

    /// Close the connection and forget tracked subscriptions.
    pub async fn disconnect(&self, ws: &mut WsClient) -> Result<(), WsError> {
        ws.disconnect().await?;
        let mut conn = self.connection.write().await;
        conn.on_disconnected();
        conn.clear_subscriptions();
        Ok(())
    }
}
