//! Domain entities.

use super::value_object::{MessageContent, MessageId, SenderName, Timestamp};

/// A message posted to the board
///
/// `id`, `sender_name` and `timestamp` are fixed at creation. Only `content`
/// changes afterwards, through [`Message::edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub content: MessageContent,
    pub sender_name: SenderName,
    pub timestamp: Timestamp,
}

impl Message {
    pub fn new(
        id: MessageId,
        content: MessageContent,
        sender_name: SenderName,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            content,
            sender_name,
            timestamp,
        }
    }

    /// Replace the content, leaving every other field untouched
    pub fn edit(&mut self, content: MessageContent) {
        self.content = content;
    }
}
