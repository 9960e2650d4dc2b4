//! UseCase: メッセージ編集処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EditMessageUseCase::execute() メソッド
//! - 本文の更新と Edited イベントのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：本文のみが更新され、ブロードキャストされる
//! - 異常系：存在しない ID（NotFound、ブロードキャストなし）

use std::sync::Arc;

use crate::domain::{
    BroadcastEvent, Message, MessageContent, MessageId, MessagePusher, MessageRepository,
};

use super::{
    error::EditMessageError,
    notify::{MutationSequencer, broadcast_best_effort},
};

/// メッセージ編集のユースケース
pub struct EditMessageUseCase {
    repository: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    sequencer: Arc<MutationSequencer>,
}

impl EditMessageUseCase {
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

    /// メッセージ編集を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 編集後のメッセージ
    /// * `Err(EditMessageError::NotFound)` - ID が存在しない（ブロードキャストなし）
    pub async fn execute(
        &self,
        id: MessageId,
        content: MessageContent,
    ) -> Result<Message, EditMessageError> {
        let _turn = self.sequencer.lock().await;
        let edited = self.repository.update_content(&id, content).await?;

        broadcast_best_effort(
            self.message_pusher.as_ref(),
            BroadcastEvent::edited(edited.clone()),
        )
        .await;

        Ok(edited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            BroadcastEventKind, BroadcastReport, MockMessagePusher, MockMessageRepository,
            RepositoryError, SenderName, Timestamp,
        },
        infrastructure::repository::InMemoryMessageRepository,
    };

    #[tokio::test]
    async fn test_edit_message_updates_content_and_broadcasts_edited() {
        // テスト項目: 本文が更新され、Edited イベントがブロードキャストされる
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new());
        let original = repository
            .create(Message::new(
                MessageId::generate(),
                MessageContent::new("hi".to_string()).unwrap(),
                SenderName::new("ann".to_string()).unwrap(),
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        let original_id = original.id;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |event| {
                event.kind == BroadcastEventKind::Edited
                    && event.message.id == original_id
                    && event.message.content.as_str() == "hello"
            })
            .times(1)
            .returning(|_| Ok(BroadcastReport::default()));
        let usecase = EditMessageUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(MutationSequencer::new()),
        );

        // when (操作):
        let edited = usecase
            .execute(original.id, MessageContent::new("hello".to_string()).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(edited.content.as_str(), "hello");
        assert_eq!(edited.sender_name, original.sender_name);
        assert_eq!(edited.timestamp, original.timestamp);
    }

    #[tokio::test]
    async fn test_edit_unknown_message_returns_not_found_without_broadcast() {
        // テスト項目: 存在しない ID の編集は NotFound となり、ブロードキャストされない
        // given (前提条件):
        let mut repository = MockMessageRepository::new();
        repository
            .expect_update_content()
            .returning(|id, _| Err(RepositoryError::NotFound(*id)));
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let usecase = EditMessageUseCase::new(
            Arc::new(repository),
            Arc::new(pusher),
            Arc::new(MutationSequencer::new()),
        );
        let unknown = MessageId::generate();

        // when (操作):
        let result = usecase
            .execute(unknown, MessageContent::new("x".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(EditMessageError::NotFound(unknown)));
    }
}
