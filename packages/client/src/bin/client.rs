//! Message board watcher.
//!
//! Connects to the server's WebSocket feed and prints every message event
//! (created, edited, deleted). Automatically reconnects on disconnection
//! (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dengon-client
//! cargo run --bin dengon-client -- --url ws://127.0.0.1:9000/ws
//! ```

use clap::Parser;

use dengon_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "dengon-client")]
#[command(about = "Watch a Dengon message board for real-time message events", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = dengon_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
