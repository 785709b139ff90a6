use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use jobworks::{api_router, Portal};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";

pub(crate) fn with_portal_routes(portal: Arc<Portal>) -> Router {
    api_router(portal)
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
}

pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn ready(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Relaxed) {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "starting" })))
    }
}

pub(crate) async fn metrics(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let body = state.metrics.render();
    (StatusCode::OK, [(header::CONTENT_TYPE, PROMETHEUS_TEXT)], body)
}
