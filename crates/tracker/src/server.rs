//! Liveness endpoint for deployment probes.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Serves `GET /health` on `port` until `cancel` fires.
///
/// Binding or serving failures are logged and end the task; the health
/// endpoint going dark must not take the pipelines with it.
pub async fn serve(port: u16, cancel: CancellationToken) {
    let app = Router::new().route("/health", get(health));

    let listener = match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(%port, %err, "could not bind health endpoint");
            return;
        }
    };
    info!(%port, "health endpoint listening");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
    {
        error!(%err, "health endpoint failed");
    }
}

async fn health() -> &'static str {
    "OK"
}
