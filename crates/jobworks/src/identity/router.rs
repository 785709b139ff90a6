use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::{IdentityView, ProfileUpdate, Registration};
use super::service::IdentityError;
use crate::portal::Portal;

pub(crate) fn routes() -> Router<Arc<Portal>> {
    Router::new()
        .route("/api/v1/register", post(register))
        .route("/api/v1/profile", get(profile).post(update_profile))
}

pub(crate) async fn register(
    State(portal): State<Arc<Portal>>,
    Json(registration): Json<Registration>,
) -> Result<impl IntoResponse, IdentityError> {
    let identity = portal.identity.register(registration)?;
    let body = json!({
        "message": format!("Account created for {}!", identity.username),
        "identity": IdentityView::from_identity(&identity),
    });
    Ok((StatusCode::CREATED, Json(body)))
}

pub(crate) async fn profile(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, IdentityError> {
    let caller = portal.guard.authenticate(&headers)?;
    Ok(Json(portal.identity.profile(&caller)?))
}

pub(crate) async fn update_profile(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, IdentityError> {
    let caller = portal.guard.authenticate(&headers)?;
    let view = portal.identity.update_profile(&caller, update)?;
    Ok(Json(json!({
        "message": "Your profile has been updated!",
        "profile": view,
    })))
}
