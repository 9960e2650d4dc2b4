//! UseCase: メッセージ単体取得（Registry には触れない）

use std::sync::Arc;

use crate::domain::{Message, MessageId, MessageRepository};

use super::error::GetMessageError;

/// メッセージ単体取得のユースケース
pub struct GetMessageUseCase {
    repository: Arc<dyn MessageRepository>,
}

impl GetMessageUseCase {
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: MessageId) -> Result<Message, GetMessageError> {
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or(GetMessageError::NotFound(id))
    }
}
