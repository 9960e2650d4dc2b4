//! Real-time message board server library.
//!
//! Messages are created, edited, listed and deleted over HTTP; every change
//! is broadcast to all connected WebSocket subscribers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
