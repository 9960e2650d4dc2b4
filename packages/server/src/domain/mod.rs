//! Domain layer for the message board.
//!
//! Contains the entities, value objects and the interfaces (traits) that the
//! use case layer depends on. Concrete implementations live in the
//! infrastructure layer (dependency inversion).

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::Message;
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::{BroadcastEvent, BroadcastEventKind};
pub use message_pusher::{
    BroadcastReport, ConnectionState, ConnectionStateCell, MessagePusher, PushFailure,
    PusherChannel,
};
pub use repository::MessageRepository;
pub use value_object::{ConnectionId, MessageContent, MessageId, SenderName, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::MockMessageRepository;
