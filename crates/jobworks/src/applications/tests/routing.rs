use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::identity::Role;

#[tokio::test]
async fn status_route_confirms_the_notified_transition() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let payload = json!({
        "status": "shortlisted",
        "employer_notes": "Strong portfolio",
        "notify_applicant": true,
    });
    let response = router
        .oneshot(post_json_as(
            &format!("/api/v1/applications/{}/status", filed.id.0),
            &employer,
            &payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Application status updated and the applicant has been notified."
    );
    assert_eq!(body["old_status"], "submitted");
    assert_eq!(body["application"]["status"], "shortlisted");
    assert_eq!(body["application"]["employer_notes"], "Strong portfolio");
    assert!(!body["application"]["notified_at"].is_null());
}

#[tokio::test]
async fn status_route_without_notify_reports_plainly() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let payload = json!({ "status": "under_review" });
    let response = router
        .oneshot(post_json_as(
            &format!("/api/v1/applications/{}/status", filed.id.0),
            &employer,
            &payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Application status updated.");
    assert!(body["application"]["notified_at"].is_null());
}

#[tokio::test]
async fn unauthenticated_callers_get_401() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));

    let response = router
        .oneshot(
            Request::get("/api/v1/my/applications")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seekers_cannot_drive_the_status_route() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let payload = json!({ "status": "accepted" });
    let response = router
        .oneshot(post_json_as(
            &format!("/api/v1/applications/{}/status", filed.id.0),
            &seeker,
            &payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "employer access required");
}

#[tokio::test]
async fn non_owner_status_updates_are_forbidden() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let rival = identity(&store, "rival-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let payload = json!({ "status": "rejected" });
    let response = router
        .oneshot(post_json_as(
            &format!("/api/v1/applications/{}/status", filed.id.0),
            &rival,
            &payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"], "you do not manage this application");
}

#[tokio::test]
async fn missing_application_is_not_found() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);

    let response = router
        .oneshot(get_as("/api/v1/applications/4242", &employer))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_status_is_unprocessable() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let payload = json!({ "status": "fast_tracked" });
    let response = router
        .oneshot(post_json_as(
            &format!("/api/v1/applications/{}/status", filed.id.0),
            &employer,
            &payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "unknown application status 'fast_tracked'");
}

#[tokio::test]
async fn apply_route_creates_and_duplicate_conflicts() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");

    let payload = json!({
        "cover_letter": "I would like to apply.",
        "resume": "resumes/dana.pdf",
    });
    let path = format!("/api/v1/jobs/{}/apply", posting.id.0);

    let response = router
        .clone()
        .oneshot(post_json_as(&path, &seeker, &payload))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Your application has been submitted successfully!"
    );
    assert_eq!(body["application"]["status"], "submitted");

    let response = router
        .oneshot(post_json_as(&path, &seeker, &payload))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"], "you have already applied for this job");
}

#[tokio::test]
async fn applicant_list_rejects_unknown_status_filters() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");

    let response = router
        .oneshot(get_as(
            &format!("/api/v1/jobs/{}/applicants?status=bogus", posting.id.0),
            &employer,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "unknown application status 'bogus'");
}

#[tokio::test]
async fn malformed_identity_headers_are_rejected() {
    let store = store();
    let router = portal_router(&store, Arc::new(RecordingMailer::default()));

    let response = router
        .oneshot(
            Request::get("/api/v1/my/applications")
                .header(crate::identity::IDENTITY_HEADER, "not-a-number")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
