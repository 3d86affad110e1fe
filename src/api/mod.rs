//! HTTP front end serving the simulated endpoints.
//!
//! - `GET /_sim/endpoints` lists the endpoint registry.
//! - Every other request is resolved against the registry and simulated;
//!   unmatched paths get 404 and known paths with the wrong method get 405.

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::Simulator;

/// State shared by all request handlers.
///
/// The simulator serializes store access internally, so no extra lock is
/// needed here.
pub struct AppState {
    pub simulator: Simulator,
}

/// Builds the axum router with the registry route and the simulated fallback.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/_sim/endpoints", get(handlers::list_endpoints))
        .fallback(handlers::dispatch)
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the server
/// fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
