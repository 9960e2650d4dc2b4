//! UseCase: リアルタイム購読者の切断処理
//!
//! 接続タスク終了時と、ブロードキャスト中の送信失敗時の両方から
//! 登録解除が起こり得るため、この処理は冪等である。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher};

/// 購読者切断のユースケース
pub struct DisconnectSubscriberUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSubscriberUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 登録解除を実行
    ///
    /// # Returns
    ///
    /// このタスクが実際に削除した場合は `true`、既に削除済みなら `false`
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        self.message_pusher
            .unregister_connection(connection_id)
            .await
    }
}
