//! Message store trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Message, MessageContent, MessageId, RepositoryError};

/// Message Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
/// 返り値は常にストア内のレコードのコピーで、ストアが唯一の所有者となる。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存し、保存されたレコードを返す
    async fn create(&self, message: Message) -> Result<Message, RepositoryError>;

    /// 全メッセージを作成順に取得
    async fn list(&self) -> Result<Vec<Message>, RepositoryError>;

    /// ID でメッセージを取得（存在しなければ `Ok(None)`）
    async fn find_by_id(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError>;

    /// 本文を更新し、更新後のレコードを返す
    async fn update_content(
        &self,
        id: &MessageId,
        content: MessageContent,
    ) -> Result<Message, RepositoryError>;

    /// メッセージを削除し、削除されたレコードを返す
    async fn delete(&self, id: &MessageId) -> Result<Message, RepositoryError>;
}
