//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! 作成順を保つため Vec をインメモリ DB として使用します。
//!
//! ## 技術的負債
//!
//! ID 検索は線形探索です。掲示板のメッセージ数が増えて問題になる場合は
//! ID → index の HashMap を併用する実装に切り替えます。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Message, MessageContent, MessageId, MessageRepository, RepositoryError};

/// インメモリ Message Repository 実装
#[derive(Default)]
pub struct InMemoryMessageRepository {
    /// 作成順に並んだメッセージ
    messages: Mutex<Vec<Message>>,
}

impl InMemoryMessageRepository {
    /// 新しい空の InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: Message) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(RepositoryError::AlreadyExists(message.id));
        }
        messages.push(message.clone());
        Ok(message)
    }

    async fn list(&self) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages.clone())
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(messages.iter().find(|m| &m.id == id).cloned())
    }

    async fn update_content(
        &self,
        id: &MessageId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let message = messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or(RepositoryError::NotFound(*id))?;
        message.edit(content);
        Ok(message.clone())
    }

    async fn delete(&self, id: &MessageId) -> Result<Message, RepositoryError> {
        let mut messages = self.messages.lock().await;
        let index = messages
            .iter()
            .position(|m| &m.id == id)
            .ok_or(RepositoryError::NotFound(*id))?;
        Ok(messages.remove(index))
    }
}
