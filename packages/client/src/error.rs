//! Error types for the watcher client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered the upgrade request with a non-101 status
    #[error("Server rejected the connection with status {0}")]
    HandshakeRejected(u16),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Gave up after repeated failures
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectLimitReached(u32),
}
