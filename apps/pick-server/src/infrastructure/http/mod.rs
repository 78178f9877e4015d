//! HTTP/REST API adapter.
//!
//! Inbound adapter implementing REST endpoints that delegate to application use cases.

mod controller;
mod cron;
mod request;
mod response;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use controller::{AppState, create_router};
pub use cron::{SCHEDULER_HEADER, authorize};
pub use request::*;
pub use response::*;

/// HTTP server error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind the listener.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(String, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

/// Bind the listener.
///
/// # Errors
///
/// Returns `ServerError::BindFailed` if the address cannot be bound.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::BindFailed(addr.to_string(), e.to_string()))?;
    tracing::info!(addr = %addr, "HTTP server listening");
    Ok(listener)
}

/// Serve `router` on `listener` until `cancel` fires.
///
/// # Errors
///
/// Returns `ServerError::ServerFailed` if the server stops with an error.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    cancel: CancellationToken,
) -> Result<(), ServerError> {
    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| ServerError::ServerFailed(e.to_string()))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
