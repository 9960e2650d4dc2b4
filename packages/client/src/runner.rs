//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{domain::should_attempt_reconnect, error::ClientError, session::run_client_session};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the watcher with reconnection logic
///
/// # Errors
///
/// Returns the session error when it is not worth retrying, or
/// [`ClientError::ReconnectLimitReached`] once every attempt has failed.
pub async fn run_client(url: String) -> Result<(), ClientError> {
    let mut failed_attempts = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                failed_attempts += 1;

                if !should_attempt_reconnect(&e, failed_attempts, MAX_RECONNECT_ATTEMPTS) {
                    if failed_attempts >= MAX_RECONNECT_ATTEMPTS {
                        return Err(ClientError::ReconnectLimitReached(MAX_RECONNECT_ATTEMPTS));
                    }
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    failed_attempts + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
