//! Dengon watcher client.
//!
//! Subscribes to the message board's WebSocket feed and prints every
//! broadcast event. Reconnects on connection loss (max 5 attempts with a
//! 5 second interval).

mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;

pub use runner::run_client;
