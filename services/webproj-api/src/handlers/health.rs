//! Health and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub catalog_entries: usize,
    pub cached_pipelines: usize,
    pub cache_hit_rate: f64,
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Readiness check (requires a non-empty catalog)
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let response = ReadyResponse {
        ready: !state.catalog.is_empty(),
        catalog_entries: state.catalog.len(),
        cached_pipelines: state.transformers.len(),
        cache_hit_rate: state.transformers.stats().hit_rate(),
    };

    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response)).into_response()
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.prometheus.render(),
    )
        .into_response()
}
