//! WebSocket を使った MessagePusher 実装（Broadcast Coordinator）
//!
//! ## 責務
//!
//! - 接続の登録・登録解除を `ConnectionRegistry` に委譲
//! - イベントを一度だけ JSON にシリアライズし、Registry のスナップショット全体に送信
//! - 送信に失敗した接続を即座に Registry から削除（リトライなし）
//!
//! ## 設計ノート
//!
//! WebSocket の生成と socket への書き込みは UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は各接続の送信キュー（`PusherChannel`）にノンブロッキングで積むだけなので、
//! 遅い接続や死んだ接続が他の接続への配信を妨げることはありません。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{
        BroadcastEvent, BroadcastReport, ConnectionId, MessagePushError, MessagePusher,
        PusherChannel,
    },
    infrastructure::dto::websocket::BroadcastEventMessage,
};

use super::ConnectionRegistry;

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let registry = Arc::new(ConnectionRegistry::new());
/// let pusher = WebSocketMessagePusher::new(registry.clone());
///
/// let report = pusher.broadcast(&BroadcastEvent::created(message)).await?;
/// ```
pub struct WebSocketMessagePusher {
    registry: Arc<ConnectionRegistry>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

/// Serialize an event into the text frame payload sent to clients
pub fn encode_event(event: &BroadcastEvent) -> Result<String, MessagePushError> {
    let frame = BroadcastEventMessage::try_from(event.clone())
        .map_err(|e| MessagePushError::Serialization(e.to_string()))?;
    serde_json::to_string(&frame).map_err(|e| MessagePushError::Serialization(e.to_string()))
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<(), MessagePushError> {
        self.registry.add(connection_id, channel).await?;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        Ok(())
    }

    async fn unregister_connection(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.registry.remove(connection_id).await;
        match removed {
            Some(channel) => {
                channel.mark_closing();
                tracing::debug!(
                    "Connection '{}' unregistered from MessagePusher",
                    connection_id
                );
                true
            }
            None => false,
        }
    }

    async fn broadcast(&self, event: &BroadcastEvent) -> Result<BroadcastReport, MessagePushError> {
        let payload = encode_event(event)?;
        let targets = self.registry.snapshot().await;
        let mut report = BroadcastReport::default();

        for (connection_id, channel) in targets {
            // ブロードキャストでは一部の送信失敗を許容し、失敗した接続は削除する
            match channel.try_push(payload.clone()) {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::debug!("Broadcasted {:?} to '{}'", event.kind, connection_id);
                }
                Err(failure) => {
                    tracing::warn!(
                        "Failed to push {:?} to '{}': {}; pruning connection",
                        event.kind,
                        connection_id,
                        failure
                    );
                    channel.mark_closing();
                    self.registry.remove(&connection_id).await;
                    report.pruned.push(connection_id);
                }
            }
        }

        Ok(report)
    }

    async fn connection_count(&self) -> usize {
        self.registry.len().await
    }

    async fn has_capacity(&self) -> bool {
        self.registry.has_capacity().await
    }
}
