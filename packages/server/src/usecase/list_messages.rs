//! UseCase: メッセージ一覧取得（Registry には触れない）

use std::sync::Arc;

use crate::domain::{Message, MessageRepository};

use super::error::ListMessagesError;

/// メッセージ一覧取得のユースケース
pub struct ListMessagesUseCase {
    repository: Arc<dyn MessageRepository>,
}

impl ListMessagesUseCase {
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    /// 作成順の全メッセージを返す
    pub async fn execute(&self) -> Result<Vec<Message>, ListMessagesError> {
        Ok(self.repository.list().await?)
    }
}
