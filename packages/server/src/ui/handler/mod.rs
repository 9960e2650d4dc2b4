//! Request handlers.

mod http;
mod websocket;

pub use http::{
    create_message, debug_connections, delete_message, edit_message, get_message, health_check,
    list_messages,
};
pub use websocket::websocket_handler;
