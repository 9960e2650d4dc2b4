//! HTTP / WebSocket surface of the message board server.

pub mod config;
mod handler;
mod server;
mod signal;
pub mod state;

pub use config::{ConnectionSettings, ServerConfig};
pub use server::Server;
pub use state::UseCases;
