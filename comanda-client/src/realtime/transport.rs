// comanda-client/src/realtime/transport.rs
// Socket channel: one background task per client, stopped by a cancellation token

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::listener::EventListener;
use super::protocol::{self, Packet};
use crate::{ClientConfig, ClientError, ClientResult};

/// Idle limit before the server's first ping interval is known
const HANDSHAKE_IDLE_SECS: u64 = 45;

/// Limit for TCP connect plus websocket upgrade
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Socket channel configuration
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Full websocket endpoint (`ws://host/socket.io/?EIO=4&transport=websocket`)
    pub endpoint: String,
    /// Reconnect after connection loss
    pub auto_reconnect: bool,
    /// First reconnect delay
    pub reconnect_delay: Duration,
    /// Upper bound of the exponential backoff
    pub max_reconnect_delay: Duration,
    /// Consecutive failed attempts before giving up (0 = unlimited)
    pub max_reconnect_attempts: u32,
}

impl RealtimeConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auto_reconnect: true,
            reconnect_delay: Duration::from_millis(500),
            max_reconnect_delay: Duration::from_secs(30),
            max_reconnect_attempts: 0,
        }
    }

    /// Derive the endpoint from the client config
    pub fn from_client(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(config.socket_endpoint()?))
    }

    /// Set auto reconnect
    pub fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    /// Set the backoff bounds
    pub fn with_reconnect_delay(mut self, initial: Duration, max: Duration) -> Self {
        self.reconnect_delay = initial;
        self.max_reconnect_delay = max;
        self
    }

    /// Set max reconnect attempts (0 = unlimited)
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }
}

/// Connection state reported by [`RealtimeClient::state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Reconnecting,
    Disconnected,
}

/// Live socket connection feeding an [`EventListener`]
///
/// Created once at startup and stopped with [`shutdown`](Self::shutdown).
/// Missed events are not replayed after a reconnect; reload from the API
/// when [`ConnectionState::Connected`] is seen again.
pub struct RealtimeClient {
    shutdown: CancellationToken,
    state: watch::Receiver<ConnectionState>,
    task: Option<JoinHandle<()>>,
}

impl RealtimeClient {
    /// Spawn the connection task
    pub fn connect(config: RealtimeConfig, listener: EventListener) -> Self {
        let shutdown = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let worker = SocketWorker {
            config,
            listener,
            shutdown: shutdown.clone(),
            state: state_tx,
        };
        let task = tokio::spawn(worker.run());
        Self {
            shutdown,
            state: state_rx,
            task: Some(task),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Watch channel for connection state changes
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Wait until the socket handshake completes
    pub async fn wait_connected(&self, timeout: Duration) -> ClientResult<()> {
        let mut rx = self.state.clone();
        let wait = rx.wait_for(|s| {
            matches!(s, ConnectionState::Connected | ConnectionState::Disconnected)
        });
        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(state)) if *state == ConnectionState::Connected => Ok(()),
            Ok(_) => Err(ClientError::Realtime("connection closed".into())),
            Err(_) => Err(ClientError::Realtime("connection timed out".into())),
        }
    }

    /// Stop the connection task and wait for it to finish
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            tracing::warn!("Socket task ended abnormally: {e}");
        }
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for RealtimeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeClient")
            .field("state", &self.state())
            .finish()
    }
}

struct SocketWorker {
    config: RealtimeConfig,
    listener: EventListener,
    shutdown: CancellationToken,
    state: watch::Sender<ConnectionState>,
}

impl SocketWorker {
    /// Connect, dispatch, reconnect with exponential backoff until shutdown
    async fn run(self) {
        tracing::info!(endpoint = %self.config.endpoint, "Socket worker started");
        let mut reconnect_delay = self.config.reconnect_delay;
        let mut failures: u32 = 0;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            match self.run_session().await {
                Ok(true) => {
                    // Session was established, so the next attempt starts fresh
                    reconnect_delay = self.config.reconnect_delay;
                    failures = 0;
                    tracing::info!("Socket disconnected");
                }
                Ok(false) => {
                    failures += 1;
                    tracing::warn!("Socket closed before handshake completed");
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!(
                        delay_ms = reconnect_delay.as_millis() as u64,
                        "Socket connection failed: {e}"
                    );
                }
            }

            if self.shutdown.is_cancelled() || !self.config.auto_reconnect {
                break;
            }
            if self.config.max_reconnect_attempts > 0
                && failures >= self.config.max_reconnect_attempts
            {
                tracing::error!(failures, "Giving up on socket reconnect");
                break;
            }

            self.state.send_replace(ConnectionState::Reconnecting);
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(reconnect_delay) => {},
            }
            reconnect_delay = (reconnect_delay * 2).min(self.config.max_reconnect_delay);
        }

        self.state.send_replace(ConnectionState::Disconnected);
        tracing::info!("Socket worker stopped");
    }

    /// Run one connection until it drops. `Ok(true)` when the handshake completed.
    async fn run_session(&self) -> ClientResult<bool> {
        let connect = tokio::time::timeout(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            tokio_tungstenite::connect_async(self.config.endpoint.as_str()),
        );
        let (ws, _response) = tokio::select! {
            _ = self.shutdown.cancelled() => return Ok(false),
            result = connect => match result {
                Ok(Ok(pair)) => pair,
                Ok(Err(e)) => return Err(ClientError::Realtime(e.to_string())),
                Err(_) => return Err(ClientError::Realtime("upgrade timed out".into())),
            },
        };
        let (mut sink, mut stream) = ws.split();

        let mut connected = false;
        let mut idle_limit = Duration::from_secs(HANDSHAKE_IDLE_SECS);

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = sink.send(Message::text(protocol::encode_disconnect())).await;
                    let _ = sink.close().await;
                    return Ok(connected);
                }
                next = tokio::time::timeout(idle_limit, stream.next()) => next,
            };

            let msg = match next {
                Ok(Some(Ok(msg))) => msg,
                Ok(Some(Err(e))) => return Err(ClientError::Realtime(e.to_string())),
                Ok(None) => return Ok(connected),
                Err(_) => return Err(ClientError::Realtime("ping timeout".into())),
            };

            let text = match msg {
                Message::Text(text) => text,
                Message::Ping(data) => {
                    let _ = sink.send(Message::Pong(data)).await;
                    continue;
                }
                Message::Close(_) => return Ok(connected),
                _ => continue,
            };

            let packet = match protocol::decode(text.as_str()) {
                Ok(packet) => packet,
                Err(e) => {
                    tracing::warn!("Skipping frame: {e}");
                    continue;
                }
            };

            match packet {
                Packet::Open(info) => {
                    idle_limit = Duration::from_millis(info.ping_interval + info.ping_timeout);
                    tracing::debug!(sid = %info.sid, "Engine.IO open");
                    sink.send(Message::text(protocol::encode_connect()))
                        .await
                        .map_err(|e| ClientError::Realtime(e.to_string()))?;
                }
                Packet::Connect { sid } => {
                    connected = true;
                    self.state.send_replace(ConnectionState::Connected);
                    tracing::info!(sid = ?sid, "Socket connected");
                }
                Packet::Ping => {
                    sink.send(Message::text(protocol::encode_pong()))
                        .await
                        .map_err(|e| ClientError::Realtime(e.to_string()))?;
                }
                Packet::Event { name, payload } => {
                    let delivered = self.listener.emit(&name, &payload);
                    tracing::debug!(event = %name, delivered, "Socket event");
                }
                Packet::ConnectError(message) => {
                    return Err(ClientError::Realtime(format!("connect refused: {message}")));
                }
                Packet::Close | Packet::Disconnect => return Ok(connected),
                Packet::Pong | Packet::Noop | Packet::Ignored => {}
            }
        }
    }
}
