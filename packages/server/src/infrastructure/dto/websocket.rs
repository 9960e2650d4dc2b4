//! WebSocket broadcast frame DTOs.

use serde::{Deserialize, Serialize};

use super::MessageDto;

/// Event kind tag carried in every broadcast frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Created,
    Edited,
    Deleted,
}

/// Broadcast frame sent to every connected client after a mutation
///
/// ```json
/// {"type":"Created","message":{"id":"...","content":"hi","senderName":"ann","timestamp":"..."}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEventMessage {
    pub r#type: EventType,
    pub message: MessageDto,
}
