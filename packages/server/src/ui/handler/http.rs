//! HTTP API endpoint handlers.
//!
//! Mutating handlers validate the body into value objects, then call the use
//! case, which stores the change and broadcasts it. Errors map to status codes
//! here; no error path broadcasts.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use crate::{
    domain::{Message, MessageContent, MessageId, SenderName, ValueObjectError},
    infrastructure::dto::{
        MessageDto,
        http::{
            ConnectionsResponse, CreateMessageRequest, EditMessageRequest, ErrorResponse,
            HealthResponse,
        },
    },
    ui::state::AppState,
    usecase::{
        CreateMessageError, DeleteMessageError, EditMessageError, GetMessageError,
        ListMessagesError,
    },
};

type ApiError = (StatusCode, Json<ErrorResponse>);

const NOT_FOUND_MESSAGE: &str = "Message not found";

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(NOT_FOUND_MESSAGE)),
    )
}

fn bad_request(error: ValueObjectError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(error.to_string())),
    )
}

/// Parse the `{id}` path segment
fn parse_id(raw: &str) -> Result<MessageId, ApiError> {
    MessageId::try_from(raw).map_err(bad_request)
}

fn internal_error(error: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
}

/// Convert a stored record to its wire shape
fn to_dto(message: Message) -> Result<MessageDto, ApiError> {
    MessageDto::try_from(message).map_err(internal_error)
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Debug endpoint: number of registered real-time connections
pub async fn debug_connections(State(state): State<Arc<AppState>>) -> Json<ConnectionsResponse> {
    let connections = state.usecases.connect_subscriber.connection_count().await;
    Json(ConnectionsResponse { connections })
}

/// `GET /messages`
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let messages = state
        .usecases
        .list_messages
        .execute()
        .await
        .map_err(|ListMessagesError::Repository(e)| internal_error(e))?;

    // Domain Model から DTO への変換
    let dtos = messages
        .into_iter()
        .map(to_dto)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(dtos))
}

/// `GET /messages/{id}`
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageDto>, ApiError> {
    match state
        .usecases
        .get_message
        .execute(parse_id(&id)?)
        .await
    {
        Ok(message) => Ok(Json(to_dto(message)?)),
        Err(GetMessageError::NotFound(_)) => Err(not_found()),
        Err(GetMessageError::Repository(e)) => Err(internal_error(e)),
    }
}

/// `POST /messages`
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<Json<MessageDto>, ApiError> {
    // Convert String -> Domain Models
    let content = MessageContent::try_from(body.content).map_err(bad_request)?;
    let sender_name = SenderName::try_from(body.sender_name).map_err(bad_request)?;
    if body.timestamp.is_some() {
        tracing::debug!("Ignoring client-supplied timestamp; the server assigns it");
    }

    match state
        .usecases
        .create_message
        .execute(content, sender_name)
        .await
    {
        Ok(message) => {
            tracing::info!(
                "Message '{}' created by '{}'",
                message.id,
                message.sender_name.as_str()
            );
            Ok(Json(to_dto(message)?))
        }
        Err(CreateMessageError::Repository(e)) => Err(internal_error(e)),
    }
}

/// `PUT /messages/{id}`
pub async fn edit_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<EditMessageRequest>,
) -> Result<Json<MessageDto>, ApiError> {
    let content = MessageContent::try_from(body.content).map_err(bad_request)?;

    match state
        .usecases
        .edit_message
        .execute(parse_id(&id)?, content)
        .await
    {
        Ok(message) => {
            tracing::info!("Message '{}' edited", message.id);
            Ok(Json(to_dto(message)?))
        }
        Err(EditMessageError::NotFound(id)) => {
            tracing::info!("Edit requested for unknown message '{}'", id);
            Err(not_found())
        }
        Err(EditMessageError::Repository(e)) => Err(internal_error(e)),
    }
}

/// `DELETE /messages/{id}`
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageDto>, ApiError> {
    match state
        .usecases
        .delete_message
        .execute(parse_id(&id)?)
        .await
    {
        Ok(message) => {
            tracing::info!("Message '{}' deleted", message.id);
            Ok(Json(to_dto(message)?))
        }
        Err(DeleteMessageError::NotFound(id)) => {
            tracing::info!("Delete requested for unknown message '{}'", id);
            Err(not_found())
        }
        Err(DeleteMessageError::Repository(e)) => Err(internal_error(e)),
    }
}
