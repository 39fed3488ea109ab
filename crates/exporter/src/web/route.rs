use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::metrics::{render_text, TEXT_CONTENT_TYPE};
use crate::state::SharedState;

/// Root handler - lists the endpoints
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "accesslog-exporter",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "metrics": "/metrics"
        }
    }))
}

/// Prometheus text exposition of every series
pub async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        render_text(&state.sink),
    )
}
