//! Native WebSocket client — `tokio-tungstenite`.
//!
//! Full implementation with:
//! - Background tokio task for connection management
//! - Application-level ping/pong health check
//! - Exponential backoff reconnection with jitter, bounded by
//!   `max_reconnect_attempts`
//! - Subscription tracking + auto-resubscribe on reconnect
//! - Message queue while reconnecting (pending messages flushed on reconnect)
//! - Stream-based event delivery to consumer

use std::pin::Pin;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream, Stream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::WsError;
use crate::shared::{AccountId, SessionId, Symbol};
use crate::ws::subscriptions::Subscription;
use crate::ws::{
    Kind, MessageIn, MessageOut, ReadyState, SubscribeParams, UnsubscribeParams, WsConfig,
    WsEvent,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Send(MessageOut),
    Disconnect,
}

// ─── Disconnect reasons for reconnection decision ────────────────────────────

#[derive(Debug, PartialEq)]
enum DisconnectReason {
    UserRequested,
    NormalClose,
    PongTimeout,
    Error(String),
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState {
    config: WsConfig,
    event_tx: mpsc::Sender<WsEvent>,
    cmd_rx: mpsc::Receiver<Command>,
    active_subscriptions: Vec<SubscribeParams>,
    pending_messages: Vec<MessageOut>,
    reconnect_attempts: u32,
    ready_state: Arc<AtomicU16>,
}

impl TaskState {
    fn emit(&self, event: WsEvent) {
        if let Err(mpsc::error::TrySendError::Full(ev)) = self.event_tx.try_send(event) {
            tracing::debug!(event = ev.name(), "event channel full, dropping event");
        }
    }

    fn should_reconnect(&self) -> bool {
        self.config.reconnect && self.reconnect_attempts < self.config.max_reconnect_attempts
    }

    fn set_ready_state(&self, rs: ReadyState) {
        self.ready_state.store(rs as u16, Ordering::SeqCst);
    }
}

// ─── Public WsClient ─────────────────────────────────────────────────────────

/// Native WebSocket client using `tokio-tungstenite`.
///
/// Uses a background tokio task for connection management.
/// The public API communicates with it via mpsc channels.
pub struct WsClient {
    config: WsConfig,
    cmd_tx: Option<mpsc::Sender<Command>>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<WsEvent>>,
    event_tx: mpsc::Sender<WsEvent>,
    task_handle: Option<JoinHandle<()>>,
    ready_state: Arc<AtomicU16>,
}

impl WsClient {
    /// Create a new WS client. Does not connect yet.
    pub fn new(config: WsConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);
        Self {
            config,
            cmd_tx: None,
            event_rx: tokio::sync::Mutex::new(event_rx),
            event_tx,
            task_handle: None,
            ready_state: Arc::new(AtomicU16::new(ReadyState::Closed as u16)),
        }
    }

    pub fn config(&self) -> &WsConfig {
        &self.config
    }

    /// Connect to the WebSocket server.
    ///
    /// Spawns a background tokio task that manages the connection,
    /// ping/pong keepalive, reconnection, and subscription tracking.
    /// Calling this while a task is running is a no-op.
    pub async fn connect(&mut self) -> Result<(), WsError> {
        if self.cmd_tx.as_ref().is_some_and(|tx| !tx.is_closed()) {
            return Ok(());
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        self.cmd_tx = Some(cmd_tx);
        self.ready_state
            .store(ReadyState::Connecting as u16, Ordering::SeqCst);

        let state = TaskState {
            config: self.config.clone(),
            event_tx: self.event_tx.clone(),
            cmd_rx,
            active_subscriptions: Vec::new(),
            pending_messages: Vec::new(),
            reconnect_attempts: 0,
            ready_state: Arc::clone(&self.ready_state),
        };

        tracing::info!(url = %self.config.url, "connecting real-time channel");
        let handle = tokio::spawn(run_task(state));
        self.task_handle = Some(handle);

        Ok(())
    }

    /// Disconnect from the WebSocket server.
    ///
    /// Sends a graceful close to the background task and waits for it to
    /// finish. A task stuck in a connect attempt is aborted after 5 seconds.
    pub async fn disconnect(&mut self) -> Result<(), WsError> {
        if let Some(tx) = self.cmd_tx.take() {
            self.ready_state
                .store(ReadyState::Closing as u16, Ordering::SeqCst);
            let _ = tx.send(Command::Disconnect).await;
        }

        if let Some(mut handle) = self.task_handle.take() {
            if tokio::time::timeout(Duration::from_secs(5), &mut handle)
                .await
                .is_err()
            {
                tracing::warn!("WebSocket task did not stop in time, aborting");
                handle.abort();
            }
        }

        self.ready_state
            .store(ReadyState::Closed as u16, Ordering::SeqCst);
        Ok(())
    }

    /// Send a message to the server.
    ///
    /// While the task is reconnecting the message is queued and flushed once
    /// the connection is back. Returns `WsError::NotConnected` if no
    /// connection task is running.
    pub fn send(&self, msg: MessageOut) -> Result<(), WsError> {
        match &self.cmd_tx {
            Some(tx) => tx.try_send(Command::Send(msg)).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    WsError::SendFailed("Command channel full".into())
                }
                mpsc::error::TrySendError::Closed(_) => WsError::NotConnected,
            }),
            None => Err(WsError::NotConnected),
        }
    }

    /// Subscribe to a channel.
    pub fn subscribe(&self, params: SubscribeParams) -> Result<(), WsError> {
        self.send(MessageOut::Subscribe(params))
    }

    /// Unsubscribe from a channel.
    pub fn unsubscribe(&self, params: UnsubscribeParams) -> Result<(), WsError> {
        self.send(MessageOut::Unsubscribe(params))
    }

    /// Live ticks (and trades, when `account_id` is set) for a symbol.
    pub fn subscribe_symbol(
        &self,
        symbol: Symbol,
        account_id: Option<AccountId>,
    ) -> Result<(), WsError> {
        self.send(MessageOut::subscribe_symbol(symbol, account_id))
    }

    pub fn unsubscribe_symbol(&self, symbol: Symbol) -> Result<(), WsError> {
        self.send(MessageOut::unsubscribe_symbol(symbol))
    }

    pub fn subscribe_session(&self, session_id: SessionId) -> Result<(), WsError> {
        self.send(MessageOut::subscribe_session(session_id))
    }

    pub fn unsubscribe_session(&self, session_id: SessionId) -> Result<(), WsError> {
        self.send(MessageOut::unsubscribe_session(session_id))
    }

    /// Ask the server to push a `system:health` event.
    pub fn request_system_health(&self) -> Result<(), WsError> {
        self.send(MessageOut::GetSystemHealth)
    }

    /// Whether the WebSocket is currently open.
    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Current connection state.
    pub fn ready_state(&self) -> ReadyState {
        ReadyState::from(self.ready_state.load(Ordering::SeqCst))
    }

    /// Force a fresh connection attempt.
    ///
    /// Tears down the current connection (if any), resets the reconnect
    /// counter, and spawns a new background task.
    pub async fn restart_connection(&mut self) {
        if self.ready_state() == ReadyState::Connecting {
            tracing::info!("Already connecting, skipping restart");
            return;
        }

        tracing::info!("Manual reconnection requested");
        self.disconnect().await.ok();
        self.connect().await.ok();
    }

    /// Get a stream of events from the WebSocket connection.
    ///
    /// The returned stream borrows `self`, so it must be dropped
    /// before calling `disconnect()`.
    pub fn events(&self) -> Pin<Box<dyn Stream<Item = WsEvent> + Send + '_>> {
        Box::pin(futures_util::stream::unfold(
            &self.event_rx,
            |rx| async move {
                let mut guard = rx.lock().await;
                guard.recv().await.map(|event| (event, rx))
            },
        ))
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task(mut state: TaskState) {
    loop {
        state.set_ready_state(ReadyState::Connecting);

        // ── 1. Attempt connection ────────────────────────────────────────
        let (sink, stream) = match attempt_connect(&state.config.url).await {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!("WebSocket connection failed: {}", e);
                state.emit(WsEvent::Error(format!("Connection failed: {}", e)));

                if !retry_after_backoff(&mut state).await {
                    return;
                }
                continue;
            }
        };

        // ── 2. Connected ─────────────────────────────────────────────────
        state.reconnect_attempts = 0;
        state.set_ready_state(ReadyState::Open);
        tracing::info!("WebSocket connected");
        state.emit(WsEvent::Connected);

        // ── 3. Resubscribe and flush pending messages ────────────────────
        let mut sink = sink;
        resubscribe_all(&mut sink, &state.active_subscriptions).await;
        flush_pending(&mut sink, &mut state.pending_messages).await;

        // ── 4. Inner select! loop ────────────────────────────────────────
        let reason = run_connected(&mut state, sink, stream).await;

        // ── 5. Post-disconnect decision ──────────────────────────────────
        state.set_ready_state(ReadyState::Closed);

        match reason {
            DisconnectReason::UserRequested | DisconnectReason::NormalClose => return,
            DisconnectReason::PongTimeout => {}
            DisconnectReason::Error(e) => tracing::debug!("connection dropped: {}", e),
        }
        if !retry_after_backoff(&mut state).await {
            return;
        }
    }
}

/// Decide whether to reconnect, and sleep for the backoff if so.
///
/// Returns `false` when the task should stop: attempts exhausted
/// (`MaxReconnectReached` is emitted) or a disconnect arrived mid-backoff.
async fn retry_after_backoff(state: &mut TaskState) -> bool {
    if !state.should_reconnect() {
        state.set_ready_state(ReadyState::Closed);
        tracing::warn!(
            attempts = state.reconnect_attempts,
            "giving up on real-time connection"
        );
        state.emit(WsEvent::MaxReconnectReached);
        return false;
    }
    state.set_ready_state(ReadyState::Connecting);
    if backoff_sleep(state).await {
        true
    } else {
        state.set_ready_state(ReadyState::Closed);
        false
    }
}

/// Inner connected loop. Runs until the connection breaks.
async fn run_connected(
    state: &mut TaskState,
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
) -> DisconnectReason {
    let ping_dur = Duration::from_millis(state.config.ping_interval_ms as u64);
    let pong_dur = Duration::from_millis(state.config.pong_timeout_ms as u64);

    let mut ping_interval = tokio::time::interval(ping_dur);
    ping_interval.reset(); // skip immediate first tick

    let mut pong_deadline: Option<tokio::time::Instant> = None;

    // Create a sleep future that we reset when a pong deadline is set.
    // When no deadline is active, we set it far in the future.
    let far_future = tokio::time::Instant::now() + Duration::from_secs(86400);
    let pong_sleep = tokio::time::sleep_until(far_future);
    tokio::pin!(pong_sleep);

    loop {
        tokio::select! {
            // ── a) Incoming WS message ───────────────────────────────────
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let text_str: &str = text.as_ref();
                        match serde_json::from_str::<MessageIn>(text_str) {
                            Ok(msg_in) => {
                                if matches!(msg_in.kind, Kind::Pong) {
                                    pong_deadline = None;
                                    pong_sleep.as_mut().reset(far_future);
                                }
                                state.emit(WsEvent::Message(msg_in.kind));
                            }
                            Err(e) => {
                                tracing::warn!(
                                    "WS deserialization error: {} (raw: {})",
                                    e,
                                    text_str
                                );
                                state.emit(WsEvent::Error(format!(
                                    "Deserialization error: {}",
                                    e
                                )));
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Pong(_))) => {
                        // WS-level pong, ignore
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = extract_close(frame.as_ref());
                        state.emit(WsEvent::Disconnected {
                            code: Some(code),
                            reason: reason.clone(),
                        });
                        return close_reason(code, reason);
                    }
                    Some(Ok(_)) => {} // Binary, Frame
                    Some(Err(e)) => {
                        let reason = e.to_string();
                        tracing::error!("WebSocket error: {}", reason);
                        state.emit(WsEvent::Disconnected {
                            code: None,
                            reason: reason.clone(),
                        });
                        return DisconnectReason::Error(reason);
                    }
                    None => {
                        state.emit(WsEvent::Disconnected {
                            code: None,
                            reason: "Stream ended".into(),
                        });
                        return DisconnectReason::Error("Stream ended".into());
                    }
                }
            }

            // ── b) Command from public API ───────────────────────────────
            cmd = state.cmd_rx.recv() => {
                match cmd {
                    Some(Command::Send(msg_out)) => {
                        track_subscription(&mut state.active_subscriptions, &msg_out);
                        if let Err(e) = send_msg(&mut sink, &msg_out).await {
                            tracing::warn!("Send failed: {}", e);
                        }
                    }
                    Some(Command::Disconnect) => {
                        let _ = sink.send(Message::Close(Some(CloseFrame {
                            code: CloseCode::Normal,
                            reason: "Client disconnect".into(),
                        }))).await;
                        state.emit(WsEvent::Disconnected {
                            code: Some(1000),
                            reason: "Client disconnect".into(),
                        });
                        return DisconnectReason::UserRequested;
                    }
                    None => {
                        // WsClient dropped
                        return DisconnectReason::UserRequested;
                    }
                }
            }

            // ── c) Ping interval ─────────────────────────────────────────
            _ = ping_interval.tick() => {
                if let Err(e) = send_msg(&mut sink, &MessageOut::Ping).await {
                    tracing::warn!("Failed to send ping: {}", e);
                } else if pong_deadline.is_none() {
                    let deadline = tokio::time::Instant::now() + pong_dur;
                    pong_deadline = Some(deadline);
                    pong_sleep.as_mut().reset(deadline);
                }
            }

            // ── d) Pong timeout ──────────────────────────────────────────
            () = &mut pong_sleep, if pong_deadline.is_some() => {
                tracing::warn!(
                    "Pong timeout, no response within {}ms",
                    state.config.pong_timeout_ms
                );
                state.emit(WsEvent::Disconnected {
                    code: None,
                    reason: "Pong timeout".into(),
                });
                let _ = sink.close().await;
                return DisconnectReason::PongTimeout;
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Attempt to establish a WebSocket connection with a 30-second timeout.
async fn attempt_connect(
    url: &str,
) -> Result<(SplitSink<WsStream, Message>, SplitStream<WsStream>), String> {
    let (ws_stream, _) = tokio::time::timeout(Duration::from_secs(30), connect_async(url))
        .await
        .map_err(|_| "Connection timeout".to_string())?
        .map_err(|e| e.to_string())?;

    Ok(ws_stream.split())
}

/// Serialize and send a MessageOut over the sink.
async fn send_msg(sink: &mut SplitSink<WsStream, Message>, msg: &MessageOut) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json.into()))
        .await
        .map_err(|e| e.to_string())
}

/// Extract close code and reason from an optional CloseFrame.
fn extract_close(frame: Option<&CloseFrame>) -> (u16, String) {
    match frame {
        Some(f) => (f.code.into(), f.reason.to_string()),
        None => (1006, "No close frame".into()),
    }
}

// ─── Subscription tracking ──────────────────────────────────────────────────

fn track_subscription(subs: &mut Vec<SubscribeParams>, msg: &MessageOut) {
    match msg {
        MessageOut::Subscribe(params) => {
            if !subs.iter().any(|s| s == params) {
                tracing::debug!(key = %params.subscription_key(), "tracking subscription");
                subs.push(params.clone());
            }
        }
        MessageOut::Unsubscribe(unsub_params) => {
            let before = subs.len();
            subs.retain(|s| !s.matches_unsubscribe(unsub_params));
            let removed = before - subs.len();
            if removed > 0 {
                tracing::debug!("Removed {} subscription(s) from tracking", removed);
            }
        }
        MessageOut::GetSystemHealth | MessageOut::Ping => {}
    }
}

async fn resubscribe_all(sink: &mut SplitSink<WsStream, Message>, subs: &[SubscribeParams]) {
    if subs.is_empty() {
        return;
    }
    tracing::info!("Resubscribing to {} tracked subscription(s)", subs.len());
    for sub in subs {
        let msg = MessageOut::Subscribe(sub.clone());
        if let Err(e) = send_msg(sink, &msg).await {
            tracing::warn!("Failed to resubscribe: {}", e);
        }
    }
}

// ─── Message queue ───────────────────────────────────────────────────────────

/// Handle a send while no connection is open.
///
/// (Un)subscriptions only update tracking, since the tracked set is replayed
/// on reconnect. Pings are dropped. Anything else is queued.
fn queue_offline(subs: &mut Vec<SubscribeParams>, pending: &mut Vec<MessageOut>, msg: MessageOut) {
    match msg {
        MessageOut::Subscribe(_) | MessageOut::Unsubscribe(_) => track_subscription(subs, &msg),
        MessageOut::Ping => {}
        other => pending.push(other),
    }
}

async fn flush_pending(sink: &mut SplitSink<WsStream, Message>, pending: &mut Vec<MessageOut>) {
    if pending.is_empty() {
        return;
    }
    tracing::info!("Flushing {} pending message(s)", pending.len());
    let messages = std::mem::take(pending);
    for msg in &messages {
        if let Err(e) = send_msg(sink, msg).await {
            tracing::warn!("Failed to flush pending message: {}", e);
        }
    }
}

/// Only a normal close (1000) ends the task; every other code reconnects.
fn close_reason(code: u16, reason: String) -> DisconnectReason {
    if code == 1000 {
        DisconnectReason::NormalClose
    } else {
        DisconnectReason::Error(reason)
    }
}

// ─── Reconnection backoff ────────────────────────────────────────────────────

const BACKOFF_CAP_MS: u32 = 60_000;
const BACKOFF_JITTER_MS: u32 = 500;

/// Delay before reconnect `attempt` (1-based), without jitter.
fn backoff_delay_ms(base_ms: u32, attempt: u32) -> u32 {
    let exp = attempt.saturating_sub(1).min(10);
    base_ms.saturating_mul(1u32 << exp).min(BACKOFF_CAP_MS)
}

/// Sleep before the next reconnect attempt while still serving commands.
///
/// Sends are queued; returns `false` if a disconnect arrives (or the client
/// is dropped) before the delay elapses.
async fn backoff_sleep(state: &mut TaskState) -> bool {
    state.reconnect_attempts += 1;
    state.emit(WsEvent::Reconnecting {
        attempt: state.reconnect_attempts,
    });

    let base = backoff_delay_ms(state.config.base_reconnect_delay_ms, state.reconnect_attempts);
    let jitter = rand::random::<u32>() % BACKOFF_JITTER_MS;
    let delay = base.saturating_add(jitter).min(BACKOFF_CAP_MS);

    tracing::info!(
        "Reconnect attempt {}/{} in {}ms",
        state.reconnect_attempts,
        state.config.max_reconnect_attempts,
        delay
    );

    let sleep = tokio::time::sleep(Duration::from_millis(delay as u64));
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return true,
            cmd = state.cmd_rx.recv() => match cmd {
                Some(Command::Send(msg)) => queue_offline(
                    &mut state.active_subscriptions,
                    &mut state.pending_messages,
                    msg,
                ),
                Some(Command::Disconnect) | None => {
                    tracing::info!("Disconnect requested during reconnect backoff");
                    return false;
                }
            },
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_client_new() {
        let client = WsClient::new(WsConfig::default());
        assert!(client.cmd_tx.is_none());
        assert_eq!(client.ready_state(), ReadyState::Closed);
        assert!(!client.is_connected());
    }

    #[test]
    fn test_send_when_not_connected() {
        let client = WsClient::new(WsConfig::default());
        let result = client.send(MessageOut::Ping);
        assert!(matches!(result, Err(WsError::NotConnected)));
        assert!(matches!(
            client.subscribe_symbol(Symbol::from("R_100"), None),
            Err(WsError::NotConnected)
        ));
    }

    #[test]
    fn test_track_subscription_add() {
        let mut subs = Vec::new();
        let msg = MessageOut::subscribe_symbol(Symbol::from("R_100"), None);
        track_subscription(&mut subs, &msg);
        assert_eq!(subs.len(), 1);

        // Duplicate, not added
        track_subscription(&mut subs, &msg);
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_track_subscription_remove() {
        let mut subs = Vec::new();
        track_subscription(
            &mut subs,
            &MessageOut::subscribe_symbol(Symbol::from("R_100"), Some(AccountId::from("a"))),
        );
        track_subscription(
            &mut subs,
            &MessageOut::subscribe_session(SessionId::from("s1")),
        );
        assert_eq!(subs.len(), 2);

        track_subscription(&mut subs, &MessageOut::unsubscribe_symbol(Symbol::from("R_100")));
        assert_eq!(subs.len(), 1);
        assert!(matches!(subs[0], SubscribeParams::Session { .. }));
    }

    #[test]
    fn test_track_subscription_noop_messages() {
        let mut subs = Vec::new();
        track_subscription(&mut subs, &MessageOut::Ping);
        track_subscription(&mut subs, &MessageOut::GetSystemHealth);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_queue_offline() {
        let mut subs = Vec::new();
        let mut pending = Vec::new();
        queue_offline(
            &mut subs,
            &mut pending,
            MessageOut::subscribe_symbol(Symbol::from("R_50"), None),
        );
        queue_offline(&mut subs, &mut pending, MessageOut::Ping);
        queue_offline(&mut subs, &mut pending, MessageOut::GetSystemHealth);

        assert_eq!(subs.len(), 1);
        assert_eq!(pending, vec![MessageOut::GetSystemHealth]);

        queue_offline(
            &mut subs,
            &mut pending,
            MessageOut::unsubscribe_symbol(Symbol::from("R_50")),
        );
        assert!(subs.is_empty());
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        assert_eq!(backoff_delay_ms(1000, 1), 1000);
        assert_eq!(backoff_delay_ms(1000, 2), 2000);
        assert_eq!(backoff_delay_ms(1000, 3), 4000);
        assert_eq!(backoff_delay_ms(1000, 10), BACKOFF_CAP_MS);
        assert_eq!(backoff_delay_ms(u32::MAX, 10), BACKOFF_CAP_MS);
        assert_eq!(backoff_delay_ms(1000, 0), 1000);
    }

    #[test]
    fn test_close_codes_other_than_normal_reconnect() {
        assert_eq!(close_reason(1000, "bye".into()), DisconnectReason::NormalClose);
        assert_eq!(
            close_reason(1008, "policy".into()),
            DisconnectReason::Error("policy".into())
        );
        assert_eq!(
            close_reason(1011, "oops".into()),
            DisconnectReason::Error("oops".into())
        );
    }

    #[test]
    fn test_extract_close_with_frame() {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "goodbye".into(),
        };
        let (code, reason) = extract_close(Some(&frame));
        assert_eq!(code, 1000);
        assert_eq!(reason, "goodbye");
    }

    #[test]
    fn test_extract_close_no_frame() {
        let (code, reason) = extract_close(None);
        assert_eq!(code, 1006);
        assert_eq!(reason, "No close frame");
    }

    #[tokio::test]
    async fn test_disconnect_when_not_connected() {
        let mut client = WsClient::new(WsConfig::default());
        let result = client.disconnect().await;
        assert!(result.is_ok());
        assert_eq!(client.ready_state(), ReadyState::Closed);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let config = WsConfig {
            url: "ws://127.0.0.1:1".to_string(),
            max_reconnect_attempts: 1,
            base_reconnect_delay_ms: 10,
            ..WsConfig::default()
        };
        let mut client = WsClient::new(config);
        client.connect().await.unwrap();

        let mut events = client.events();
        let mut names = Vec::new();
        while let Some(ev) = tokio::time::timeout(Duration::from_secs(10), events.next())
            .await
            .unwrap()
        {
            let done = ev == WsEvent::MaxReconnectReached;
            names.push(ev.name().to_string());
            if done {
                break;
            }
        }
        assert_eq!(
            names,
            [
                "connection:error",
                "connection:reconnecting",
                "connection:error",
                "connection:failed"
            ]
        );
    }
}
