//! UseCase: リアルタイム購読者の接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSubscriberUseCase::execute() / has_capacity()
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続が Registry に登録される
//! - 異常系：接続数の上限超過

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

use super::error::ConnectError;

/// 購読者接続のユースケース
pub struct ConnectSubscriberUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSubscriberUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// アップグレード前の容量チェック
    pub async fn has_capacity(&self) -> bool {
        self.message_pusher.has_capacity().await
    }

    /// アップグレード済みの接続を登録する
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> Result<(), ConnectError> {
        self.message_pusher
            .register_connection(connection_id, channel)
            .await
            .map_err(|e| match e {
                MessagePushError::CapacityExceeded(limit) => ConnectError::CapacityExceeded(limit),
                other => ConnectError::RegistrationFailed(other.to_string()),
            })
    }

    /// 現在の接続数
    pub async fn connection_count(&self) -> usize {
        self.message_pusher.connection_count().await
    }
}
