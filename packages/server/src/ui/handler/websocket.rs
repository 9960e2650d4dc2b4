//! WebSocket connection handlers.
//!
//! Each accepted upgrade runs two tasks:
//!
//! - the reader loop: sole reader of the inbound stream, ignores application
//!   frames and decides when the connection is over
//! - the pusher loop: drains the connection's outbound queue onto the socket
//!   and sends keep-alive pings
//!
//! Whichever ends first ends the other, then the connection deregisters.

use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    body::Bytes,
    extract::{
        State,
        ws::{
            CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code,
            rejection::WebSocketUpgradeRejection,
        },
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{Instant, MissedTickBehavior},
};

use crate::{
    domain::{ConnectionId, ConnectionState, ConnectionStateCell, PusherChannel},
    infrastructure::dto::http::ErrorResponse,
    ui::state::AppState,
    usecase::ConnectError,
};

/// Upper bound on waiting for the close frame to go out
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Why a connection is being closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    /// Peer sent a close frame
    PeerClosed,
    /// Receive failed or the stream ended without a close frame
    TransportError,
    /// No inbound frame within the keep-alive window
    IdleTimeout,
    ServerShutdown,
}

impl CloseReason {
    fn close_frame(self) -> CloseFrame {
        let (code, reason) = match self {
            Self::PeerClosed => (close_code::NORMAL, ""),
            Self::TransportError => (close_code::ERROR, "transport error"),
            Self::IdleTimeout => (close_code::AWAY, "keep-alive timeout"),
            Self::ServerShutdown => (close_code::AWAY, "server shutting down"),
        };
        CloseFrame {
            code,
            reason: reason.into(),
        }
    }
}

/// `GET /ws`
pub async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!("Rejected non-upgrade request to /ws: {}", rejection);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(rejection.body_text())),
            )
                .into_response();
        }
    };

    if !state.usecases.connect_subscriber.has_capacity().await {
        tracing::warn!("Connection limit reached. Rejecting WebSocket upgrade.");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Connection limit reached")),
        )
            .into_response();
    }

    ws.on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let settings = state.connection_settings;
    let (mut sender, receiver) = socket.split();

    // Create a bounded outbound queue for this connection
    let (tx, rx) = mpsc::channel(settings.outbound_buffer.max(1));
    let connection_state = ConnectionStateCell::new();

    match state
        .usecases
        .connect_subscriber
        .execute(connection_id, PusherChannel::new(tx, connection_state.clone()))
        .await
    {
        Ok(()) => {
            tracing::info!(
                "Connection '{}' opened ({} connected)",
                connection_id,
                state.usecases.connect_subscriber.connection_count().await
            );
        }
        Err(e) => {
            tracing::warn!("Rejecting connection '{}': {}", connection_id, e);
            let code = match e {
                ConnectError::CapacityExceeded(_) => close_code::AGAIN,
                ConnectError::RegistrationFailed(_) => close_code::ERROR,
            };
            let _ = sender
                .send(Message::Close(Some(CloseFrame {
                    code,
                    reason: e.to_string().into(),
                })))
                .await;
            return;
        }
    }

    let (close_tx, close_rx) = oneshot::channel();
    let mut send_task = pusher_loop(connection_id, rx, sender, close_rx, settings.ping_interval);
    let mut recv_task = tokio::spawn(reader_loop(
        connection_id,
        receiver,
        settings.idle_timeout(),
        state.shutdown.clone(),
    ));

    // If any one of the tasks completes, finish the other
    tokio::select! {
        reason = &mut recv_task => {
            let reason = reason.unwrap_or(CloseReason::TransportError);
            connection_state.advance(ConnectionState::Closing);
            let _ = close_tx.send(reason);
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut send_task).await.is_err() {
                tracing::debug!("Close frame to '{}' timed out", connection_id);
                send_task.abort();
            }
        }
        _ = &mut send_task => {
            connection_state.advance(ConnectionState::Closing);
            recv_task.abort();
        }
    };

    connection_state.advance(ConnectionState::Closed);
    let removed = state
        .usecases
        .disconnect_subscriber
        .execute(&connection_id)
        .await;
    tracing::info!(
        "Connection '{}' closed{} ({} connected)",
        connection_id,
        if removed { "" } else { " (already pruned)" },
        state.usecases.connect_subscriber.connection_count().await
    );
}

/// Consume inbound frames until the connection is over
///
/// Inbound application data is ignored: the protocol is broadcast-only.
async fn reader_loop(
    connection_id: ConnectionId,
    mut receiver: SplitStream<WebSocket>,
    idle_timeout: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> CloseReason {
    if *shutdown.borrow_and_update() {
        return CloseReason::ServerShutdown;
    }

    loop {
        tokio::select! {
            // 送信側が破棄された場合もサーバー停止として扱う
            _ = shutdown.changed() => return CloseReason::ServerShutdown,
            next = tokio::time::timeout(idle_timeout, receiver.next()) => {
                let msg = match next {
                    Err(_) => {
                        tracing::warn!(
                            "No frame from '{}' within {:?}; treating as dead",
                            connection_id,
                            idle_timeout
                        );
                        return CloseReason::IdleTimeout;
                    }
                    Ok(None) => {
                        tracing::debug!("Stream from '{}' ended without close frame", connection_id);
                        return CloseReason::TransportError;
                    }
                    Ok(Some(Err(e))) => {
                        tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                        return CloseReason::TransportError;
                    }
                    Ok(Some(Ok(msg))) => msg,
                };

                match msg {
                    Message::Close(frame) => {
                        tracing::info!(
                            "Connection '{}' requested close ({:?})",
                            connection_id,
                            frame.map(|f| f.code)
                        );
                        return CloseReason::PeerClosed;
                    }
                    Message::Text(text) => {
                        tracing::debug!(
                            "Ignoring {} byte text frame from '{}'",
                            text.len(),
                            connection_id
                        );
                    }
                    Message::Binary(data) => {
                        tracing::debug!(
                            "Ignoring {} byte binary frame from '{}'",
                            data.len(),
                            connection_id
                        );
                    }
                    Message::Ping(_) | Message::Pong(_) => {
                        // Ping/pong is handled automatically by the WebSocket protocol
                        tracing::trace!("Keep-alive frame from '{}'", connection_id);
                    }
                }
            }
        }
    }
}

/// Spawns a task that drains the outbound queue to the WebSocket sender.
///
/// Also sends a ping every `ping_interval`. Ends when told to close, when the
/// queue is closed (the connection was pruned from the registry), or when a
/// write fails.
fn pusher_loop(
    connection_id: ConnectionId,
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    mut close_rx: oneshot::Receiver<CloseReason>,
    ping_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut keep_alive = tokio::time::interval_at(Instant::now() + ping_interval, ping_interval);
        keep_alive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                reason = &mut close_rx => {
                    if let Ok(reason) = reason {
                        let _ = sender.send(Message::Close(Some(reason.close_frame()))).await;
                    }
                    break;
                }
                payload = rx.recv() => match payload {
                    Some(payload) => {
                        if let Err(e) = sender.send(Message::Text(payload.into())).await {
                            tracing::debug!("Write to '{}' failed: {}", connection_id, e);
                            break;
                        }
                    }
                    None => {
                        // Registry から削除された（送信キューが溢れた）
                        tracing::info!("Connection '{}' was pruned; closing", connection_id);
                        let _ = sender
                            .send(Message::Close(Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "outbound queue overflow".into(),
                            })))
                            .await;
                        break;
                    }
                },
                _ = keep_alive.tick() => {
                    if let Err(e) = sender.send(Message::Ping(Bytes::new())).await {
                        tracing::debug!("Ping to '{}' failed: {}", connection_id, e);
                        break;
                    }
                }
            }
        }

        let _ = sender.close().await;
    })
}
