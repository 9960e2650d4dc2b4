//! Message board server with real-time WebSocket broadcast.
//!
//! Serves the REST API for messages and pushes every create / edit / delete
//! to all connected WebSocket clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dengon-server
//! cargo run --bin dengon-server -- --host 0.0.0.0 --port 3000 --max-connections 500
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use dengon_server::{
    infrastructure::{
        message_pusher::{ConnectionRegistry, WebSocketMessagePusher},
        repository::InMemoryMessageRepository,
    },
    ui::{ConnectionSettings, Server, ServerConfig, UseCases},
};
use dengon_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "dengon-server")]
#[command(about = "Message board server with real-time WebSocket broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds between keep-alive pings; a client silent for twice this long is dropped
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    ping_interval_secs: u64,

    /// Outbound queue size per connection; a client that falls this far behind is dropped
    #[arg(long, default_value = "64")]
    outbound_buffer: usize,

    /// Maximum number of simultaneous WebSocket connections (unbounded if omitted)
    #[arg(long)]
    max_connections: Option<usize>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory database)
    let repository = Arc::new(InMemoryMessageRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let registry = Arc::new(ConnectionRegistry::with_capacity_limit(args.max_connections));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(registry));

    // 3. Create UseCases
    let usecases = UseCases::new(repository, message_pusher, Arc::new(SystemClock));

    // 4. Create and run the server
    let config = ServerConfig {
        host: args.host,
        port: args.port,
        connection: ConnectionSettings {
            ping_interval: Duration::from_secs(args.ping_interval_secs),
            outbound_buffer: args.outbound_buffer,
        },
    };
    let server = Server::new(config, usecases);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
