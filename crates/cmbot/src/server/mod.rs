//! HTTP relay that forwards GroupMe callbacks to Slack.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::CmBotError;
use crate::notify::ChatService;

mod endpoints;
mod types;

use endpoints::relay;

/// Shared state of the relay server.
pub struct RelayState {
    pub slack: Option<Arc<dyn ChatService>>,
}

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `state`: The relay state.
///
/// # Returns
/// The router.
pub fn create_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/", post(relay::post_callback))
        .route("/health", get(relay::get_health))
        .with_state(state)
}

/// Serves the relay until Ctrl+C.
pub async fn run_server(addr: &str, state: Arc<RelayState>) -> Result<(), CmBotError> {
    let listener = TcpListener::bind(addr).await.map_err(|e| CmBotError::Config {
        message: format!("Failed to bind {addr}: {e}"),
    })?;
    info!(addr = %addr, "Relay server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| CmBotError::Config {
            message: format!("Relay server failed: {e}"),
        })
}
