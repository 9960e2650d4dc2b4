//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::watch};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    config::{ConnectionSettings, ServerConfig},
    handler::{
        create_message, debug_connections, delete_message, edit_message, get_message,
        health_check, list_messages, websocket_handler,
    },
    signal::shutdown_signal,
    state::{AppState, UseCases},
};

/// How long `serve` waits for connection tasks to deregister after shutdown
const CONNECTION_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Message board server
///
/// # Example
///
/// ```ignore
/// let usecases = UseCases::new(repository, message_pusher, Arc::new(SystemClock));
/// let server = Server::new(ServerConfig::default(), usecases);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    usecases: UseCases,
}

impl Server {
    pub fn new(config: ServerConfig, usecases: UseCases) -> Self {
        Self { config, usecases }
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Message board server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// When `shutdown` resolves, every open WebSocket connection is told to
    /// close and the server waits briefly for them to deregister.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let connect_subscriber = self.usecases.connect_subscriber.clone();
        let app = build_router(self.usecases, self.config.connection, shutdown_rx);

        let notify_connections = async move {
            shutdown.await;
            tracing::info!("Closing all WebSocket connections");
            let _ = shutdown_tx.send(true);
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(notify_connections)
            .await?;

        let drained = tokio::time::timeout(CONNECTION_DRAIN_TIMEOUT, async {
            while connect_subscriber.connection_count().await > 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await;
        if drained.is_err() {
            tracing::warn!(
                "{} connection(s) still open after {:?}",
                connect_subscriber.connection_count().await,
                CONNECTION_DRAIN_TIMEOUT
            );
        }

        Ok(())
    }
}

/// Build the application router
pub fn build_router(
    usecases: UseCases,
    connection_settings: ConnectionSettings,
    shutdown: watch::Receiver<bool>,
) -> Router {
    let app_state = Arc::new(AppState {
        usecases,
        connection_settings,
        shutdown,
    });

    // 全てのオリジンからのアクセスを許可
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/messages", get(list_messages).post(create_message))
        .route(
            "/messages/{id}",
            get(get_message).put(edit_message).delete(delete_message),
        )
        .route("/health-check", get(health_check))
        .route("/debug/connections", get(debug_connections))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
