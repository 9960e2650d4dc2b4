//! UseCase errors.

use thiserror::Error;

use crate::domain::{MessageId, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateMessageError {
    #[error("Failed to store message: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditMessageError {
    #[error("Message '{0}' not found")]
    NotFound(MessageId),

    #[error("Failed to update message: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for EditMessageError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeleteMessageError {
    #[error("Message '{0}' not found")]
    NotFound(MessageId),

    #[error("Failed to delete message: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DeleteMessageError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetMessageError {
    #[error("Message '{0}' not found")]
    NotFound(MessageId),

    #[error("Failed to load message: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListMessagesError {
    #[error("Failed to list messages: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Connection limit of {0} reached")]
    CapacityExceeded(usize),

    #[error("Failed to register connection: {0}")]
    RegistrationFailed(String),
}
