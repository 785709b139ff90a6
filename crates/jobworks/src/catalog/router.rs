use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;

use super::domain::{CompanyForm, JobDraft, JobId};
use super::search::JobFilterParams;
use super::service::CatalogError;
use crate::identity::Role;
use crate::portal::Portal;

pub(crate) fn routes() -> Router<Arc<Portal>> {
    Router::new()
        .route("/api/v1/jobs", get(list_jobs).post(post_job))
        .route("/api/v1/jobs/:job_id", get(job_detail))
        .route("/api/v1/jobs/:job_id/edit", post(edit_job))
        .route("/api/v1/jobs/:job_id/toggle", post(toggle_job))
        .route("/api/v1/jobs/:job_id/save", post(save_job))
        .route("/api/v1/jobs/:job_id/unsave", post(unsave_job))
        .route("/api/v1/my/saved-jobs", get(saved_jobs))
        .route("/api/v1/companies", get(companies).post(create_company))
}

pub(crate) async fn list_jobs(
    State(portal): State<Arc<Portal>>,
    Query(params): Query<JobFilterParams>,
) -> Result<impl IntoResponse, CatalogError> {
    let filter = params.into_filter()?;
    Ok(Json(portal.catalog.list_jobs(&filter, Utc::now())?))
}

pub(crate) async fn job_detail(
    State(portal): State<Arc<Portal>>,
    Path(job_id): Path<u64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CatalogError> {
    let caller = portal.guard.optional(&headers)?;
    let view = portal
        .catalog
        .job_detail(caller.as_ref(), JobId(job_id), Utc::now())?;
    Ok(Json(view))
}

pub(crate) async fn post_job(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Result<impl IntoResponse, CatalogError> {
    let caller = portal.guard.require(&headers, Role::Employer)?;
    let now = Utc::now();
    let job = portal.catalog.post_job(&caller, draft, now)?;
    let view = portal.catalog.job_detail(None, job.id, now)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Job posted successfully!", "job": view })),
    ))
}

pub(crate) async fn edit_job(
    State(portal): State<Arc<Portal>>,
    Path(job_id): Path<u64>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Result<impl IntoResponse, CatalogError> {
    let caller = portal.guard.require(&headers, Role::Employer)?;
    let now = Utc::now();
    let job = portal.catalog.edit_job(&caller, JobId(job_id), draft, now)?;
    let view = portal.catalog.job_detail(None, job.id, now)?;
    Ok(Json(json!({ "message": "Job updated successfully!", "job": view })))
}

pub(crate) async fn toggle_job(
    State(portal): State<Arc<Portal>>,
    Path(job_id): Path<u64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CatalogError> {
    let caller = portal.guard.require(&headers, Role::Employer)?;
    let job = portal
        .catalog
        .toggle_job(&caller, JobId(job_id), Utc::now())?;
    let message = if job.is_active {
        "Job activated successfully."
    } else {
        "Job deactivated successfully."
    };
    Ok(Json(json!({
        "message": message,
        "job_id": job.id,
        "is_active": job.is_active,
    })))
}

pub(crate) async fn save_job(
    State(portal): State<Arc<Portal>>,
    Path(job_id): Path<u64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CatalogError> {
    let caller = portal.guard.require(&headers, Role::JobSeeker)?;
    let outcome = portal.catalog.save_job(&caller, JobId(job_id))?;
    let message = if outcome.created {
        "Job saved successfully!"
    } else {
        "Job is already in your saved list."
    };
    Ok(Json(json!({ "message": message, "created": outcome.created })))
}

pub(crate) async fn unsave_job(
    State(portal): State<Arc<Portal>>,
    Path(job_id): Path<u64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CatalogError> {
    let caller = portal.guard.require(&headers, Role::JobSeeker)?;
    let removed = portal.catalog.unsave_job(&caller, JobId(job_id))?;
    Ok(Json(json!({
        "message": "Job removed from your saved jobs.",
        "removed": removed,
    })))
}

pub(crate) async fn saved_jobs(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CatalogError> {
    let caller = portal.guard.require(&headers, Role::JobSeeker)?;
    Ok(Json(portal.catalog.saved_jobs(&caller)?))
}

pub(crate) async fn companies(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CatalogError> {
    portal.guard.require(&headers, Role::Employer)?;
    Ok(Json(portal.catalog.companies()?))
}

pub(crate) async fn create_company(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
    Json(form): Json<CompanyForm>,
) -> Result<impl IntoResponse, CatalogError> {
    portal.guard.require(&headers, Role::Employer)?;
    let company = portal.catalog.create_company(form)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Company created successfully!", "company": company })),
    ))
}
