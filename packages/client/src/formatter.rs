//! Message formatting utilities for client display.

use dengon_server::infrastructure::dto::{
    MessageDto,
    websocket::{BroadcastEventMessage, EventType},
};

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one broadcast frame
    ///
    /// ```text
    /// + [2025-01-01T00:00:00.000Z] @ann: hi
    ///   id: 6f1c...
    /// ```
    pub fn format_event(event: &BroadcastEventMessage) -> String {
        let marker = match event.r#type {
            EventType::Created => '+',
            EventType::Edited => '~',
            EventType::Deleted => '-',
        };
        Self::format_record(marker, &event.message)
    }

    fn format_record(marker: char, message: &MessageDto) -> String {
        format!(
            "{} [{}] @{}: {}\n  id: {}\n",
            marker, message.timestamp, message.sender_name, message.content, message.id
        )
    }

    /// Format a text frame that is not a broadcast event
    pub fn format_raw_message(text: &str) -> String {
        format!("? {}\n", text)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("? <{} bytes of binary data>\n", byte_count)
    }
}
