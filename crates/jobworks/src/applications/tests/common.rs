use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::applications::domain::{ApplicationForm, StatusUpdateRequest};
use crate::applications::repository::{ApplicationRepository, NewApplication};
use crate::applications::{Application, ApplicationService};
use crate::catalog::repository::{CompanyRepository, JobRepository, NewCompany, NewJob};
use crate::catalog::{Company, ExperienceLevel, Job, JobType};
use crate::identity::repository::{IdentityRepository, NewIdentity};
use crate::identity::{Identity, Role, IDENTITY_HEADER};
use crate::notifications::mail::{MailError, MailMessage, MailTransport};
use crate::notifications::StatusChangeNotifier;
use crate::portal::{api_router, Portal, PortalStores};
use crate::store::memory::MemoryStore;

pub(super) const MAIL_FROM: &str = "noreply@jobworks.dev";

#[derive(Default)]
pub(super) struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub(super) fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl MailTransport for RecordingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) struct FailingMailer;

impl MailTransport for FailingMailer {
    fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("smtp refused".to_string()))
    }
}

pub(super) fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::default())
}

pub(super) fn service(
    store: &Arc<MemoryStore>,
    mailer: Arc<dyn MailTransport>,
) -> ApplicationService {
    let notifier = StatusChangeNotifier::new(store.clone(), mailer, MAIL_FROM.to_string());
    ApplicationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        notifier,
    )
}

pub(super) fn portal_router(
    store: &Arc<MemoryStore>,
    mailer: Arc<dyn MailTransport>,
) -> Router {
    let portal = Portal::new(
        PortalStores::from_memory(store),
        mailer,
        MAIL_FROM.to_string(),
    );
    api_router(Arc::new(portal))
}

pub(super) fn identity(store: &MemoryStore, username: &str, role: Role) -> Identity {
    store
        .insert_identity(NewIdentity {
            username: username.to_string(),
            email: format!("{username}@example.test"),
            role,
            phone: None,
        })
        .expect("insert identity")
}

pub(super) fn company(store: &MemoryStore, name: &str) -> Company {
    store
        .insert_company(NewCompany {
            name: name.to_string(),
            description: String::new(),
            website: String::new(),
            logo: None,
        })
        .expect("insert company")
}

pub(super) fn job(store: &MemoryStore, owner: &Identity, company: &Company, title: &str) -> Job {
    store
        .insert_job(NewJob {
            title: title.to_string(),
            company: company.id,
            owner: owner.id,
            description: "Build and run the service.".to_string(),
            requirements: "Rust".to_string(),
            location: "Berlin".to_string(),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Mid,
            salary: Some(70_000),
            application_deadline: Utc::now() + Duration::days(30),
        })
        .expect("insert job")
}

pub(super) fn application(store: &MemoryStore, job: &Job, applicant: &Identity) -> Application {
    store
        .insert_application(NewApplication {
            job: job.id,
            applicant: applicant.id,
            cover_letter: "I would like to apply.".to_string(),
            resume: "resumes/applicant.pdf".to_string(),
        })
        .expect("insert application")
}

pub(super) fn form() -> ApplicationForm {
    ApplicationForm {
        cover_letter: "I would like to apply.".to_string(),
        resume: "resumes/applicant.pdf".to_string(),
    }
}

pub(super) fn update(status: &str, notes: &str, notify: bool) -> StatusUpdateRequest {
    StatusUpdateRequest {
        status: status.to_string(),
        employer_notes: notes.to_string(),
        notify_applicant: notify,
    }
}

pub(super) fn get_as(path: &str, caller: &Identity) -> Request<Body> {
    Request::get(path)
        .header(IDENTITY_HEADER, caller.id.0.to_string())
        .body(Body::empty())
        .expect("request builds")
}

pub(super) fn post_json_as(path: &str, caller: &Identity, payload: &Value) -> Request<Body> {
    Request::post(path)
        .header(IDENTITY_HEADER, caller.id.0.to_string())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serialize")))
        .expect("request builds")
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body within limit");
    serde_json::from_slice(&bytes).expect("body is json")
}
