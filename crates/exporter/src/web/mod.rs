//! Web: HTTP surface serving the Prometheus `/metrics` endpoint.

pub mod route;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::state::SharedState;

/// Build the application router
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(route::root_handler))
        .route("/metrics", get(route::metrics_handler))
        .with_state(state)
}

/// Serve the router on `listener` until `cancel` fires.
pub async fn serve_http(
    listener: TcpListener,
    state: SharedState,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Metrics endpoint on http://{}/metrics", addr);
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
}
