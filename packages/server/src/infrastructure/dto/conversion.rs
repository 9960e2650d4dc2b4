//! Conversion logic between DTOs and domain entities.

use dengon_shared::time::{rfc3339_to_timestamp, timestamp_to_rfc3339};

use crate::domain::{
    BroadcastEvent, BroadcastEventKind, Message, MessageContent, MessageId, SenderName, Timestamp,
    ValueObjectError,
};

use super::{
    MessageDto,
    websocket::{BroadcastEventMessage, EventType},
};

// ========================================
// Domain Entity → DTO
// ========================================

impl TryFrom<Message> for MessageDto {
    type Error = ValueObjectError;

    fn try_from(model: Message) -> Result<Self, Self::Error> {
        let millis = model.timestamp.value();
        let timestamp = timestamp_to_rfc3339(millis)
            .ok_or_else(|| ValueObjectError::InvalidTimestamp(millis.to_string()))?;
        Ok(Self {
            id: *model.id.as_uuid(),
            content: model.content.into_string(),
            sender_name: model.sender_name.into_string(),
            timestamp,
        })
    }
}

impl From<BroadcastEventKind> for EventType {
    fn from(kind: BroadcastEventKind) -> Self {
        match kind {
            BroadcastEventKind::Created => Self::Created,
            BroadcastEventKind::Edited => Self::Edited,
            BroadcastEventKind::Deleted => Self::Deleted,
        }
    }
}

impl TryFrom<BroadcastEvent> for BroadcastEventMessage {
    type Error = ValueObjectError;

    fn try_from(event: BroadcastEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            r#type: event.kind.into(),
            message: event.message.try_into()?,
        })
    }
}

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<MessageDto> for Message {
    type Error = ValueObjectError;

    fn try_from(dto: MessageDto) -> Result<Self, Self::Error> {
        let timestamp = rfc3339_to_timestamp(&dto.timestamp)
            .ok_or_else(|| ValueObjectError::InvalidTimestamp(dto.timestamp.clone()))?;
        Ok(Self::new(
            MessageId::from_uuid(dto.id),
            MessageContent::new(dto.content)?,
            SenderName::new(dto.sender_name)?,
            Timestamp::new(timestamp),
        ))
    }
}

impl From<EventType> for BroadcastEventKind {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::Created => Self::Created,
            EventType::Edited => Self::Edited,
            EventType::Deleted => Self::Deleted,
        }
    }
}

impl TryFrom<BroadcastEventMessage> for BroadcastEvent {
    type Error = ValueObjectError;

    fn try_from(dto: BroadcastEventMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: dto.r#type.into(),
            message: dto.message.try_into()?,
        })
    }
}
