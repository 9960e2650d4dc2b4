//! UseCase: メッセージ削除処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeleteMessageUseCase::execute() メソッド
//! - 削除と Deleted イベントのブロードキャスト（削除されたレコードを配信）
//!
//! ### どのような状況を想定しているか
//! - 正常系：削除されたレコードが返され、一覧から消える
//! - 異常系：存在しない ID（NotFound、ブロードキャストなし）

use std::sync::Arc;

use crate::domain::{BroadcastEvent, Message, MessageId, MessagePusher, MessageRepository};

use super::{
    error::DeleteMessageError,
    notify::{MutationSequencer, broadcast_best_effort},
};

/// メッセージ削除のユースケース
pub struct DeleteMessageUseCase {
    repository: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<MutationSequencer>,
}

impl DeleteMessageUseCase {
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        sequencer: Arc<MutationSequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer,
        }
    }

    /// メッセージ削除を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 削除されたメッセージ
    /// * `Err(DeleteMessageError::NotFound)` - ID が存在しない（ブロードキャストなし）
    pub async fn execute(&self, id: MessageId) -> Result<Message, DeleteMessageError> {
        let _turn = self.sequencer.lock().await;
        let deleted = self.repository.delete(&id).await?;

        broadcast_best_effort(
            self.message_pusher.as_ref(),
            BroadcastEvent::deleted(deleted.clone()),
        )
        .await;

        Ok(deleted)
    }
}
