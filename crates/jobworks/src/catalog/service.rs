use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use super::domain::{Company, CompanyForm, CompanyId, Job, JobDraft, JobDraftError, JobId};
use super::repository::{
    CompanyRepository, JobRepository, NewCompany, NewJob, SavedJobRepository,
};
use super::search::{FilterError, JobFilter};
use crate::applications::repository::ApplicationRepository;
use crate::identity::{AuthError, EmployerProfile, Identity, IdentityRepository, Role};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("job not found")]
    NotFound,
    #[error(transparent)]
    Draft(#[from] JobDraftError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("complete your employer profile before posting jobs")]
    IncompleteEmployerProfile,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    fn status(&self) -> StatusCode {
        match self {
            CatalogError::Auth(err) => err.status(),
            CatalogError::NotFound => StatusCode::NOT_FOUND,
            CatalogError::Draft(_)
            | CatalogError::Filter(_)
            | CatalogError::IncompleteEmployerProfile
            | CatalogError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Compact listing row.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummaryView {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: &'static str,
    pub experience_level: &'static str,
    pub salary: Option<u32>,
    pub application_deadline: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub fn job_summary(job: &Job, company_name: &str) -> JobSummaryView {
    JobSummaryView {
        id: job.id,
        title: job.title.clone(),
        company: company_name.to_string(),
        location: job.location.clone(),
        job_type: job.job_type.label(),
        experience_level: job.experience_level.label(),
        salary: job.salary,
        application_deadline: job.application_deadline,
        is_active: job.is_active,
        created_at: job.created_at,
    }
}

#[derive(Debug, Serialize)]
pub struct JobListView {
    pub total: usize,
    pub jobs: Vec<JobSummaryView>,
}

/// Full posting plus the caller-specific flags the detail page renders.
#[derive(Debug, Serialize)]
pub struct JobDetailView {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub job_type: &'static str,
    pub experience_level: &'static str,
    pub salary: Option<u32>,
    pub application_deadline: DateTime<Utc>,
    pub is_active: bool,
    pub is_expired: bool,
    pub created_at: DateTime<Utc>,
    pub has_applied: bool,
    pub is_saved: bool,
}

#[derive(Debug, Serialize)]
pub struct SavedJobView {
    pub job: JobSummaryView,
    pub saved_at: DateTime<Utc>,
}

/// Whether `save_job` created a new bookmark or found an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub created: bool,
}

/// Job catalog behavior: browsing for seekers, posting and lifecycle for
/// employers, and the company directory.
pub struct CatalogService {
    companies: Arc<dyn CompanyRepository>,
    jobs: Arc<dyn JobRepository>,
    saved: Arc<dyn SavedJobRepository>,
    applications: Arc<dyn ApplicationRepository>,
    identities: Arc<dyn IdentityRepository>,
}

impl CatalogService {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        jobs: Arc<dyn JobRepository>,
        saved: Arc<dyn SavedJobRepository>,
        applications: Arc<dyn ApplicationRepository>,
        identities: Arc<dyn IdentityRepository>,
    ) -> Self {
        Self {
            companies,
            jobs,
            saved,
            applications,
            identities,
        }
    }

    /// Open postings (active, deadline in the future) matching `filter`,
    /// newest first.
    pub fn list_jobs(
        &self,
        filter: &JobFilter,
        now: DateTime<Utc>,
    ) -> Result<JobListView, CatalogError> {
        let names = self.company_names()?;
        let jobs: Vec<JobSummaryView> = self
            .jobs
            .list_jobs()?
            .into_iter()
            .filter(|job| job.is_open(now))
            .filter(|job| filter.matches(job, company_name(&names, job)))
            .map(|job| job_summary(&job, company_name(&names, &job)))
            .collect();
        Ok(JobListView {
            total: jobs.len(),
            jobs,
        })
    }

    /// Detail is reachable by direct link even for paused or expired
    /// postings; the flags tell the page what to render.
    pub fn job_detail(
        &self,
        caller: Option<&Identity>,
        id: JobId,
        now: DateTime<Utc>,
    ) -> Result<JobDetailView, CatalogError> {
        let job = self.jobs.find_job(id)?.ok_or(CatalogError::NotFound)?;
        let company = self
            .companies
            .find_company(job.company)?
            .map(|company| company.name)
            .unwrap_or_default();

        let (has_applied, is_saved) = match caller {
            Some(identity) if identity.role == Role::JobSeeker => (
                self.applications.has_applied(job.id, identity.id)?,
                self.saved.saved_job_exists(job.id, identity.id)?,
            ),
            _ => (false, false),
        };

        Ok(JobDetailView {
            id: job.id,
            title: job.title.clone(),
            company,
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            location: job.location.clone(),
            job_type: job.job_type.label(),
            experience_level: job.experience_level.label(),
            salary: job.salary,
            application_deadline: job.application_deadline,
            is_active: job.is_active,
            is_expired: job.is_expired(now),
            created_at: job.created_at,
            has_applied,
            is_saved,
        })
    }

    /// Creates a posting under the caller's company, creating the company
    /// record on first use.
    pub fn post_job(
        &self,
        caller: &Identity,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<Job, CatalogError> {
        let profile = self
            .identities
            .employer_profile(caller.id)?
            .filter(|profile| !profile.company_name.trim().is_empty())
            .ok_or(CatalogError::IncompleteEmployerProfile)?;
        draft.validate(now)?;
        let company = self.ensure_company(&profile)?;

        Ok(self.jobs.insert_job(NewJob {
            title: draft.title,
            company: company.id,
            owner: caller.id,
            description: draft.description,
            requirements: draft.requirements,
            location: draft.location,
            job_type: draft.job_type,
            experience_level: draft.experience_level,
            salary: draft.salary,
            application_deadline: draft.application_deadline,
        })?)
    }

    /// Rewrites a posting the caller owns. Someone else's posting is reported
    /// as missing rather than forbidden.
    pub fn edit_job(
        &self,
        caller: &Identity,
        id: JobId,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<Job, CatalogError> {
        let mut job = self.owned_job(caller, id)?;
        draft.validate(now)?;

        job.title = draft.title;
        job.description = draft.description;
        job.requirements = draft.requirements;
        job.location = draft.location;
        job.job_type = draft.job_type;
        job.experience_level = draft.experience_level;
        job.salary = draft.salary;
        job.application_deadline = draft.application_deadline;
        job.updated_at = now;

        self.jobs.update_job(job.clone())?;
        Ok(job)
    }

    /// Flips the active flag on a posting the caller owns.
    pub fn toggle_job(
        &self,
        caller: &Identity,
        id: JobId,
        now: DateTime<Utc>,
    ) -> Result<Job, CatalogError> {
        let mut job = self.owned_job(caller, id)?;
        job.is_active = !job.is_active;
        job.updated_at = now;
        self.jobs.update_job(job.clone())?;
        Ok(job)
    }

    /// Bookmarks an active posting. Saving twice is not an error.
    pub fn save_job(&self, caller: &Identity, id: JobId) -> Result<SaveOutcome, CatalogError> {
        let job = self.jobs.find_job(id)?.ok_or(CatalogError::NotFound)?;
        if !job.is_active {
            return Err(CatalogError::NotFound);
        }
        match self.saved.insert_saved_job(job.id, caller.id) {
            Ok(_) => Ok(SaveOutcome { created: true }),
            Err(StoreError::Conflict) => Ok(SaveOutcome { created: false }),
            Err(err) => Err(err.into()),
        }
    }

    /// Removes a bookmark; removing one that never existed is a no-op.
    pub fn unsave_job(&self, caller: &Identity, id: JobId) -> Result<bool, CatalogError> {
        self.jobs.find_job(id)?.ok_or(CatalogError::NotFound)?;
        Ok(self.saved.delete_saved_job(id, caller.id)?)
    }

    pub fn saved_jobs(&self, caller: &Identity) -> Result<Vec<SavedJobView>, CatalogError> {
        let names = self.company_names()?;
        let mut views = Vec::new();
        for bookmark in self.saved.list_saved_jobs_for(caller.id)? {
            if let Some(job) = self.jobs.find_job(bookmark.job)? {
                views.push(SavedJobView {
                    job: job_summary(&job, company_name(&names, &job)),
                    saved_at: bookmark.saved_at,
                });
            }
        }
        Ok(views)
    }

    pub fn companies(&self) -> Result<Vec<Company>, CatalogError> {
        Ok(self.companies.list_companies()?)
    }

    /// Names are free-form; creating a second company under an existing
    /// name is a normal insert, not a conflict.
    pub fn create_company(&self, form: CompanyForm) -> Result<Company, CatalogError> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        Ok(self.companies.insert_company(NewCompany {
            name,
            description: form.description,
            website: form.website,
            logo: form.logo,
        })?)
    }

    fn owned_job(&self, caller: &Identity, id: JobId) -> Result<Job, CatalogError> {
        let job = self.jobs.find_job(id)?.ok_or(CatalogError::NotFound)?;
        if job.owner != caller.id {
            return Err(CatalogError::NotFound);
        }
        Ok(job)
    }

    // Get-or-create keyed on the profile's company name. With duplicate
    // names allowed, postings reuse whichever row the lookup returns.
    fn ensure_company(&self, profile: &EmployerProfile) -> Result<Company, CatalogError> {
        if let Some(existing) = self.companies.find_company_by_name(&profile.company_name)? {
            return Ok(existing);
        }
        Ok(self.companies.insert_company(NewCompany {
            name: profile.company_name.clone(),
            description: profile.company_description.clone(),
            website: profile.company_website.clone(),
            logo: profile.company_logo.clone(),
        })?)
    }

    fn company_names(&self) -> Result<HashMap<CompanyId, String>, CatalogError> {
        Ok(self
            .companies
            .list_companies()?
            .into_iter()
            .map(|company| (company.id, company.name))
            .collect())
    }
}

fn company_name<'a>(
    names: &'a HashMap<CompanyId, String>,
    job: &Job,
) -> &'a str {
    names.get(&job.company).map(String::as_str).unwrap_or("")
}
