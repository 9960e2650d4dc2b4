//! Domain logic for client-side operations.
//!
//! Pure functions only, so the reconnect policy can be tested without a
//! server.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// A 4xx handshake rejection (wrong path, not a WebSocket endpoint) will not
/// fix itself by retrying. 5xx rejections such as a full server are retried.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    match error {
        ClientError::HandshakeRejected(status) => (400..500).contains(status),
        ClientError::ConnectionError(_) => false,
        ClientError::ReconnectLimitReached(_) => true,
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
