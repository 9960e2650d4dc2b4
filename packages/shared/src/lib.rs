//! Utilities shared by the Dengon server and client.

pub mod logger;
pub mod time;
