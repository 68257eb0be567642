//! HTTP/WebSocket API layer.
//!
//! This module contains thin handlers that delegate to services.
//! It provides the router construction and server startup functionality.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::artwork::ArtworkStore;
use crate::bootstrap::BootstrappedServices;
use crate::services::SyncHandle;
use crate::state::Config;

pub mod http;
pub mod ws;
pub mod ws_connection;

pub use ws_connection::{ClientHandle, ConnectionGuard, ConnectionRegistry};

/// Errors that can occur when starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to a TCP port or serve on it.
    #[error("Failed to bind to port: {0}")]
    Bind(#[from] std::io::Error),
}

/// Shared application state for the API layer.
///
/// This is a thin wrapper that holds references to services.
/// All business logic lives in the services themselves.
#[derive(Clone)]
pub struct AppState {
    /// The single connected UI client.
    pub registry: Arc<ConnectionRegistry>,
    /// Command channel into the sync engine.
    pub sync: SyncHandle,
    /// Latest cover art for `/artwork`.
    pub artwork: Arc<ArtworkStore>,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the API state from bootstrapped services.
    pub fn new(services: &BootstrappedServices) -> Self {
        Self {
            registry: Arc::clone(&services.registry),
            sync: services.sync.clone(),
            artwork: Arc::clone(&services.artwork),
            config: Arc::clone(&services.config),
        }
    }
}

/// Starts the HTTP server on the configured port.
pub async fn start_server(state: AppState) -> Result<(), ServerError> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.bind_port));
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, state).await
}

/// Serves the API on an already-bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    log::info!("[Server] Listening on http://{}", listener.local_addr()?);
    let app = http::create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
