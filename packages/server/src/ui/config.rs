//! Server configuration.

use std::time::Duration;

/// Per-connection tuning for real-time subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Interval between keep-alive pings sent to each client
    pub ping_interval: Duration,
    /// Capacity of each connection's outbound queue; a full queue gets the connection dropped
    pub outbound_buffer: usize,
}

impl ConnectionSettings {
    /// Silence on the inbound side for this long marks the connection dead
    pub fn idle_timeout(&self) -> Duration {
        self.ping_interval * 2
    }
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(30),
            outbound_buffer: 64,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to (e.g., "127.0.0.1")
    pub host: String,
    /// Port number to bind to (e.g., 8080)
    pub port: u16,
    pub connection: ConnectionSettings,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            connection: ConnectionSettings::default(),
        }
    }
}
