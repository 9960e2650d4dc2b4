//! Data Transfer Objects (DTOs) for the message board.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket broadcast frame DTOs
//! - `http`: HTTP API request/response DTOs
//!
//! Both protocols share [`MessageDto`] as the wire shape of a message record.

pub mod conversion;
pub mod http;
pub mod websocket;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire representation of a message record (lowerCamelCase fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: Uuid,
    pub content: String,
    pub sender_name: String,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}
