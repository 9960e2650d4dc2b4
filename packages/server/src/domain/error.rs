//! Domain errors.

use thiserror::Error;

use super::value_object::MessageId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Message content must not be empty")]
    ContentEmpty,

    #[error("Message content is too long ({length} characters, max {max})")]
    ContentTooLong { length: usize, max: usize },

    #[error("Sender name must not be empty")]
    SenderNameEmpty,

    #[error("Sender name is too long ({length} characters, max {max})")]
    SenderNameTooLong { length: usize, max: usize },

    #[error("Invalid message id: '{0}'")]
    InvalidMessageId(String),

    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),
}

/// Message store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Message '{0}' not found")]
    NotFound(MessageId),

    #[error("Message '{0}' already exists")]
    AlreadyExists(MessageId),
}

/// Broadcast / connection registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Failed to serialize broadcast payload: {0}")]
    Serialization(String),

    #[error("Connection limit of {0} reached")]
    CapacityExceeded(usize),
}
