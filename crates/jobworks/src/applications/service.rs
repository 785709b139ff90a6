use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use super::domain::{
    ApplicantFilter, Application, ApplicationForm, ApplicationId, ApplicationStatus,
    StatusUpdateRequest,
};
use super::repository::{ApplicationRepository, NewApplication};
use crate::catalog::repository::{CompanyRepository, JobRepository};
use crate::catalog::{Job, JobId};
use crate::identity::{AuthError, Identity, IdentityRepository};
use crate::notifications::{EmailDispatch, Notification, StatusChange, StatusChangeNotifier};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("job not found")]
    JobNotFound,
    #[error("application not found")]
    NotFound,
    #[error("you have already applied for this job")]
    AlreadyApplied,
    #[error("the application deadline for this job has passed")]
    DeadlinePassed,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("unknown application status '{0}'")]
    UnknownStatus(String),
    #[error("you do not manage this application")]
    NotJobOwner,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApplicationError {
    fn status(&self) -> StatusCode {
        match self {
            ApplicationError::Auth(err) => err.status(),
            ApplicationError::JobNotFound | ApplicationError::NotFound => StatusCode::NOT_FOUND,
            ApplicationError::AlreadyApplied => StatusCode::CONFLICT,
            ApplicationError::DeadlinePassed
            | ApplicationError::MissingField(_)
            | ApplicationError::UnknownStatus(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationError::NotJobOwner => StatusCode::FORBIDDEN,
            ApplicationError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApplicationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Seeker-facing row: own application with job context, employer notes
/// withheld.
#[derive(Debug, Serialize)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub job: JobId,
    pub job_title: String,
    pub company: String,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
    pub last_status_update: DateTime<Utc>,
    pub notes: String,
}

/// One row in the owning employer's applicant list.
#[derive(Debug, Serialize)]
pub struct ApplicantRow {
    pub application: ApplicationId,
    pub username: String,
    pub email: String,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
    pub cover_letter: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicantListView {
    pub job: JobId,
    pub job_title: String,
    pub total: usize,
    pub applicants: Vec<ApplicantRow>,
}

/// Full record for the owning employer.
#[derive(Debug, Serialize)]
pub struct ApplicationDetailView {
    pub id: ApplicationId,
    pub job: JobId,
    pub job_title: String,
    pub company: String,
    pub applicant_username: String,
    pub applicant_email: String,
    pub cover_letter: String,
    pub resume: String,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
    pub notes: String,
    pub employer_notes: String,
    pub last_status_update: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
}

/// What a status update actually did.
///
/// The transition in `application` is committed even when the email leg
/// failed; `email` reports delivery separately so callers can surface one
/// without lying about the other.
#[derive(Debug)]
pub struct StatusUpdateOutcome {
    pub application: Application,
    pub old_status: ApplicationStatus,
    pub audit: Notification,
    pub applicant_notice: Option<Notification>,
    pub email: Option<EmailDispatch>,
}

impl StatusUpdateOutcome {
    pub fn notified(&self) -> bool {
        self.applicant_notice.is_some()
    }
}

/// Application intake and the employer-driven status workflow.
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    companies: Arc<dyn CompanyRepository>,
    identities: Arc<dyn IdentityRepository>,
    notifier: StatusChangeNotifier,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        companies: Arc<dyn CompanyRepository>,
        identities: Arc<dyn IdentityRepository>,
        notifier: StatusChangeNotifier,
    ) -> Self {
        Self {
            applications,
            jobs,
            companies,
            identities,
            notifier,
        }
    }

    /// Files an application against an active posting.
    ///
    /// Paused postings read as missing; an expired deadline or a repeat
    /// application is rejected before anything is written.
    pub fn apply(
        &self,
        caller: &Identity,
        job_id: JobId,
        form: ApplicationForm,
        now: DateTime<Utc>,
    ) -> Result<Application, ApplicationError> {
        let job = self
            .jobs
            .find_job(job_id)?
            .filter(|job| job.is_active)
            .ok_or(ApplicationError::JobNotFound)?;
        if self.applications.has_applied(job.id, caller.id)? {
            return Err(ApplicationError::AlreadyApplied);
        }
        if job.is_expired(now) {
            return Err(ApplicationError::DeadlinePassed);
        }
        if form.cover_letter.trim().is_empty() {
            return Err(ApplicationError::MissingField("cover_letter"));
        }
        if form.resume.trim().is_empty() {
            return Err(ApplicationError::MissingField("resume"));
        }

        match self.applications.insert_application(NewApplication {
            job: job.id,
            applicant: caller.id,
            cover_letter: form.cover_letter,
            resume: form.resume,
        }) {
            Ok(application) => Ok(application),
            // Raced a concurrent submit from the same account.
            Err(StoreError::Conflict) => Err(ApplicationError::AlreadyApplied),
            Err(err) => Err(err.into()),
        }
    }

    /// The caller's applications, newest first, with job context.
    pub fn my_applications(
        &self,
        caller: &Identity,
    ) -> Result<Vec<ApplicationView>, ApplicationError> {
        let mut views = Vec::new();
        for application in self.applications.list_applications_by_applicant(caller.id)? {
            let (job_title, company) = match self.jobs.find_job(application.job)? {
                Some(job) => (job.title.clone(), self.company_name(&job)?),
                None => (String::new(), String::new()),
            };
            views.push(ApplicationView {
                id: application.id,
                job: application.job,
                job_title,
                company,
                status: application.status.label(),
                applied_at: application.applied_at,
                last_status_update: application.last_status_update,
                notes: application.notes.clone(),
            });
        }
        Ok(views)
    }

    /// Applicants to a posting the caller owns. Someone else's posting reads
    /// as missing.
    pub fn applicants(
        &self,
        caller: &Identity,
        job_id: JobId,
        filter: &ApplicantFilter,
    ) -> Result<ApplicantListView, ApplicationError> {
        let job = self
            .jobs
            .find_job(job_id)?
            .filter(|job| job.owner == caller.id)
            .ok_or(ApplicationError::JobNotFound)?;

        let mut applicants = Vec::new();
        for application in self.applications.list_applications_for_job(job.id)? {
            let Some(identity) = self.identities.find_identity(application.applicant)? else {
                continue;
            };
            if !filter.matches(&application, &identity) {
                continue;
            }
            applicants.push(ApplicantRow {
                application: application.id,
                username: identity.username,
                email: identity.email,
                status: application.status.label(),
                applied_at: application.applied_at,
                cover_letter: application.cover_letter.clone(),
            });
        }

        Ok(ApplicantListView {
            job: job.id,
            job_title: job.title,
            total: applicants.len(),
            applicants,
        })
    }

    /// Full record for the owning employer. Anyone else sees not-found.
    pub fn detail(
        &self,
        caller: &Identity,
        id: ApplicationId,
    ) -> Result<ApplicationDetailView, ApplicationError> {
        let application = self
            .applications
            .find_application(id)?
            .ok_or(ApplicationError::NotFound)?;
        let job = self
            .jobs
            .find_job(application.job)?
            .ok_or(ApplicationError::NotFound)?;
        if job.owner != caller.id {
            return Err(ApplicationError::NotFound);
        }
        let applicant = self
            .identities
            .find_identity(application.applicant)?
            .ok_or(StoreError::NotFound)?;

        Ok(ApplicationDetailView {
            id: application.id,
            job: job.id,
            job_title: job.title.clone(),
            company: self.company_name(&job)?,
            applicant_username: applicant.username,
            applicant_email: applicant.email,
            cover_letter: application.cover_letter,
            resume: application.resume,
            status: application.status.label(),
            applied_at: application.applied_at,
            notes: application.notes,
            employer_notes: application.employer_notes,
            last_status_update: application.last_status_update,
            notified_at: application.notified_at,
        })
    }

    /// Applies a status transition and fans out its notifications.
    ///
    /// Effect order: commit the new status and employer notes, write the
    /// employer audit row, then only when requested send the email, stamp
    /// `notified_at`, and write the applicant's row. The email is
    /// best-effort; everything after it happens whether or not it went out.
    pub fn update_status(
        &self,
        caller: &Identity,
        id: ApplicationId,
        request: StatusUpdateRequest,
        now: DateTime<Utc>,
    ) -> Result<StatusUpdateOutcome, ApplicationError> {
        let mut application = self
            .applications
            .find_application(id)?
            .ok_or(ApplicationError::NotFound)?;
        let job = self
            .jobs
            .find_job(application.job)?
            .ok_or(ApplicationError::NotFound)?;
        if job.owner != caller.id {
            return Err(ApplicationError::NotJobOwner);
        }
        let new_status = ApplicationStatus::parse(&request.status)
            .ok_or_else(|| ApplicationError::UnknownStatus(request.status.clone()))?;
        let applicant = self
            .identities
            .find_identity(application.applicant)?
            .ok_or(StoreError::NotFound)?;

        // Read-modify-write: a concurrent update between our read and this
        // write is last-writer-wins, and old_status reflects our read.
        let old_status = application.status;
        application.status = new_status;
        application.employer_notes = request.employer_notes;
        application.last_status_update = now;
        self.applications.update_application(application.clone())?;

        let change = StatusChange {
            application: application.id,
            job_title: job.title.clone(),
            company_name: self.company_name(&job)?,
            applicant: applicant.id,
            applicant_username: applicant.username.clone(),
            applicant_email: applicant.email.clone(),
            employer: caller.id,
            old_status,
            new_status,
        };

        let audit = self.notifier.record_audit(&change)?;

        let (email, applicant_notice) = if request.notify_applicant {
            let email = self.notifier.send_status_email(&change);
            application.notified_at = Some(now);
            self.applications.update_application(application.clone())?;
            let notice = self.notifier.record_applicant_notice(&change)?;
            (Some(email), Some(notice))
        } else {
            (None, None)
        };

        Ok(StatusUpdateOutcome {
            application,
            old_status,
            audit,
            applicant_notice,
            email,
        })
    }

    fn company_name(&self, job: &Job) -> Result<String, ApplicationError> {
        Ok(self
            .companies
            .find_company(job.company)?
            .map(|company| company.name)
            .unwrap_or_default())
    }
}
