//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// `POST /messages` body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub content: String,
    pub sender_name: String,
    /// Accepted for compatibility but never used: the server assigns the timestamp.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

/// `PUT /messages/{id}` body
#[derive(Debug, Clone, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

/// Error body for 4xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `GET /health-check` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// `GET /debug/connections` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionsResponse {
    pub connections: usize,
}
