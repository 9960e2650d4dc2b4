//! Infrastructure layer: concrete store, WebSocket broadcaster and DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
