//! WebSocket watcher session.

use std::time::Duration;

use dengon_server::infrastructure::dto::websocket::BroadcastEventMessage;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        Error as WsError,
        protocol::{CloseFrame, Message, frame::coding::CloseCode},
    },
};

use super::{error::ClientError, formatter::MessageFormatter};

/// How long to wait for the server's close reply after Ctrl+C
const CLOSE_REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Run one watcher session
///
/// Returns `Ok(())` when the user exits with Ctrl+C, or an error when the
/// connection could not be established or was lost.
pub async fn run_client_session(url: &str) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        WsError::Http(response) => ClientError::HandshakeRejected(response.status().as_u16()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to message board!");
    println!("\nWatching {} for message events. Press Ctrl+C to exit.\n", url);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted; closing connection");
                let _ = write
                    .send(Message::Close(Some(CloseFrame {
                        code: CloseCode::Normal,
                        reason: "client exit".into(),
                    })))
                    .await;
                // Wait for the close reply so the server sees a clean shutdown
                let _ = tokio::time::timeout(CLOSE_REPLY_TIMEOUT, async {
                    while let Some(Ok(msg)) = read.next().await {
                        if msg.is_close() {
                            break;
                        }
                    }
                })
                .await;
                return Ok(());
            }
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let formatted = match serde_json::from_str::<BroadcastEventMessage>(text.as_str()) {
                        Ok(event) => MessageFormatter::format_event(&event),
                        Err(e) => {
                            tracing::debug!("Unrecognized frame: {}", e);
                            MessageFormatter::format_raw_message(text.as_str())
                        }
                    };
                    print!("{}", formatted);
                }
                Some(Ok(Message::Binary(data))) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                }
                Some(Ok(Message::Close(frame))) => {
                    let reason = match frame {
                        Some(frame) => format!(
                            "Server closed the connection ({}: {})",
                            u16::from(frame.code),
                            frame.reason.as_str()
                        ),
                        None => "Server closed the connection".to_string(),
                    };
                    tracing::info!("{}", reason);
                    return Err(ClientError::ConnectionError(reason));
                }
                // Ping/Pong は tungstenite が自動で応答する
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
                None => {
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
            }
        }
    }
}
