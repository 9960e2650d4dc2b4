//! UseCase: メッセージ作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateMessageUseCase::execute() メソッド
//! - ID とタイムスタンプの払い出し、保存、Created イベントのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - タイムスタンプはサーバーが付与する（クライアント指定値は使わない）
//! - ブロードキャストの失敗が作成結果に影響しないことを保証する

use std::sync::Arc;

use dengon_shared::time::Clock;

use crate::domain::{
    BroadcastEvent, Message, MessageContent, MessageId, MessagePusher, MessageRepository,
    SenderName, Timestamp,
};

use super::{
    error::CreateMessageError,
    notify::{MutationSequencer, broadcast_best_effort},
};

/// メッセージ作成のユースケース
pub struct CreateMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MessageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 作成時刻の取得元
    clock: Arc<dyn Clock>,
    /// 保存とブロードキャストの順序を揃える
    sequencer: Arc<MutationSequencer>,
}

impl CreateMessageUseCase {
    /// 新しい CreateMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        sequencer: Arc<MutationSequencer>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            sequencer,
        }
    }

    /// メッセージ作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 保存されたメッセージ
    /// * `Err(CreateMessageError)` - 保存失敗（ブロードキャストは行われない）
    pub async fn execute(
        &self,
        content: MessageContent,
        sender_name: SenderName,
    ) -> Result<Message, CreateMessageError> {
        let message = Message::new(
            MessageId::generate(),
            content,
            sender_name,
            Timestamp::new(self.clock.now_millis()),
        );

        // 1. Repository に保存（これが正）
        let _turn = self.sequencer.lock().await;
        let created = self.repository.create(message).await?;

        // 2. 保存後にブロードキャスト
        broadcast_best_effort(
            self.message_pusher.as_ref(),
            BroadcastEvent::created(created.clone()),
        )
        .await;

        Ok(created)
    }
}
