use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::NotificationId;
use super::service::NotificationError;
use crate::portal::Portal;

pub(crate) fn routes() -> Router<Arc<Portal>> {
    Router::new()
        .route("/api/v1/notifications", get(inbox))
        .route("/api/v1/notifications/:notification_id/read", post(mark_read))
        .route("/api/v1/notifications/read-all", post(mark_all_read))
}

pub(crate) async fn inbox(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, NotificationError> {
    let caller = portal.guard.authenticate(&headers)?;
    Ok(Json(portal.notifications.inbox(&caller)?))
}

pub(crate) async fn mark_read(
    State(portal): State<Arc<Portal>>,
    Path(notification_id): Path<u64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, NotificationError> {
    let caller = portal.guard.authenticate(&headers)?;
    let view = portal
        .notifications
        .mark_read(&caller, NotificationId(notification_id))?;
    Ok(Json(json!({
        "message": "Notification marked as read.",
        "notification": view,
    })))
}

pub(crate) async fn mark_all_read(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, NotificationError> {
    let caller = portal.guard.authenticate(&headers)?;
    let marked = portal.notifications.mark_all_read(&caller)?;
    Ok(Json(json!({
        "message": "All notifications marked as read.",
        "marked": marked,
    })))
}
