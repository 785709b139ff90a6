use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use super::domain::{
    ApplicantFilterParams, ApplicationForm, ApplicationId, StatusUpdateRequest,
};
use super::service::ApplicationError;
use crate::catalog::JobId;
use crate::identity::Role;
use crate::portal::Portal;

pub(crate) fn routes() -> Router<Arc<Portal>> {
    Router::new()
        .route("/api/v1/jobs/:job_id/apply", post(apply))
        .route("/api/v1/jobs/:job_id/applicants", get(applicants))
        .route("/api/v1/my/applications", get(my_applications))
        .route("/api/v1/applications/:application_id", get(detail))
        .route(
            "/api/v1/applications/:application_id/status",
            post(update_status),
        )
}

pub(crate) async fn apply(
    State(portal): State<Arc<Portal>>,
    Path(job_id): Path<u64>,
    headers: HeaderMap,
    Json(form): Json<ApplicationForm>,
) -> Result<impl IntoResponse, ApplicationError> {
    let caller = portal.guard.require(&headers, Role::JobSeeker)?;
    let application = portal
        .applications
        .apply(&caller, JobId(job_id), form, Utc::now())?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Your application has been submitted successfully!",
            "application": {
                "id": application.id,
                "job": application.job,
                "status": application.status.label(),
                "applied_at": application.applied_at,
            },
        })),
    ))
}

pub(crate) async fn my_applications(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApplicationError> {
    let caller = portal.guard.require(&headers, Role::JobSeeker)?;
    Ok(Json(portal.applications.my_applications(&caller)?))
}

pub(crate) async fn applicants(
    State(portal): State<Arc<Portal>>,
    Path(job_id): Path<u64>,
    headers: HeaderMap,
    Query(params): Query<ApplicantFilterParams>,
) -> Result<impl IntoResponse, ApplicationError> {
    let caller = portal.guard.require(&headers, Role::Employer)?;
    let filter = params
        .into_filter()
        .map_err(ApplicationError::UnknownStatus)?;
    let view = portal
        .applications
        .applicants(&caller, JobId(job_id), &filter)?;
    Ok(Json(view))
}

pub(crate) async fn detail(
    State(portal): State<Arc<Portal>>,
    Path(application_id): Path<u64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApplicationError> {
    let caller = portal.guard.require(&headers, Role::Employer)?;
    let view = portal
        .applications
        .detail(&caller, ApplicationId(application_id))?;
    Ok(Json(view))
}

pub(crate) async fn update_status(
    State(portal): State<Arc<Portal>>,
    Path(application_id): Path<u64>,
    headers: HeaderMap,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<impl IntoResponse, ApplicationError> {
    let caller = portal.guard.require(&headers, Role::Employer)?;
    let outcome = portal.applications.update_status(
        &caller,
        ApplicationId(application_id),
        request,
        Utc::now(),
    )?;
    let message = if outcome.notified() {
        "Application status updated and the applicant has been notified."
    } else {
        "Application status updated."
    };
    Ok(Json(json!({
        "message": message,
        "old_status": outcome.old_status.label(),
        "application": {
            "id": outcome.application.id,
            "status": outcome.application.status.label(),
            "employer_notes": outcome.application.employer_notes,
            "last_status_update": outcome.application.last_status_update,
            "notified_at": outcome.application.notified_at,
        },
    })))
}
