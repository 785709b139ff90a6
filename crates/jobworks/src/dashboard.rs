//! Landing and dashboard surfaces: the public home feed, the role-branched
//! dashboard, and the employer overview.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::applications::repository::ApplicationRepository;
use crate::applications::{Application, ApplicationId, ApplicationStatus, ApplicationView};
use crate::catalog::repository::{CompanyRepository, JobRepository, SavedJobRepository};
use crate::catalog::{job_summary, CompanyId, JobId, JobSummaryView};
use crate::identity::repository::IdentityRepository;
use crate::identity::{AuthError, Identity, IdentityId, Role};
use crate::notifications::repository::NotificationRepository;
use crate::portal::Portal;
use crate::store::StoreError;

const HOME_FEED_LIMIT: usize = 6;
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DashboardError {
    fn status(&self) -> StatusCode {
        match self {
            DashboardError::Auth(err) => err.status(),
            DashboardError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            DashboardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub jobs: Vec<JobSummaryView>,
}

/// Role-branched dashboard payload. The tag mirrors the caller's role.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardView {
    JobSeeker(SeekerOverview),
    Employer(EmployerOverview),
    Admin(AdminOverview),
}

#[derive(Debug, Serialize)]
pub struct SeekerOverview {
    pub recent_applications: Vec<ApplicationView>,
    pub saved_jobs: usize,
}

#[derive(Debug, Serialize)]
pub struct EmployerOverview {
    pub jobs: Vec<EmployerJobRow>,
    pub total_applications: usize,
    pub active_jobs: usize,
    pub unread_notifications: usize,
    pub status_breakdown: Vec<StatusCount>,
}

/// One posting in the employer overview, with its applicant volume.
#[derive(Debug, Serialize)]
pub struct EmployerJobRow {
    pub id: JobId,
    pub title: String,
    pub is_active: bool,
    pub is_expired: bool,
    pub application_deadline: DateTime<Utc>,
    pub applications: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub total_users: usize,
    pub total_jobs: usize,
    pub total_applications: usize,
    pub total_companies: usize,
    pub job_seekers: usize,
    pub employers: usize,
    pub admins: usize,
    pub new_users_week: usize,
    pub new_jobs_week: usize,
    pub new_applications_week: usize,
    pub active_jobs: usize,
    pub expired_jobs: usize,
    pub status_breakdown: Vec<StatusCount>,
    pub recent_users: Vec<RecentUser>,
    pub recent_jobs: Vec<RecentJob>,
    pub recent_applications: Vec<RecentApplication>,
}

#[derive(Debug, Serialize)]
pub struct RecentUser {
    pub id: IdentityId,
    pub username: String,
    pub role: &'static str,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RecentJob {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RecentApplication {
    pub id: ApplicationId,
    pub job_title: String,
    pub applicant: String,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
}

/// Read-only aggregation over every area's repository.
pub struct DashboardService {
    identities: Arc<dyn IdentityRepository>,
    companies: Arc<dyn CompanyRepository>,
    jobs: Arc<dyn JobRepository>,
    saved_jobs: Arc<dyn SavedJobRepository>,
    applications: Arc<dyn ApplicationRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl DashboardService {
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        companies: Arc<dyn CompanyRepository>,
        jobs: Arc<dyn JobRepository>,
        saved_jobs: Arc<dyn SavedJobRepository>,
        applications: Arc<dyn ApplicationRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self {
            identities,
            companies,
            jobs,
            saved_jobs,
            applications,
            notifications,
        }
    }

    /// The six most recently posted active jobs. Pausing removes a posting
    /// from the feed; an expired deadline does not.
    pub fn home(&self) -> Result<HomeView, DashboardError> {
        let names = self.company_names()?;
        let jobs = self
            .jobs
            .list_jobs()?
            .into_iter()
            .filter(|job| job.is_active)
            .take(HOME_FEED_LIMIT)
            .map(|job| job_summary(&job, names.get(&job.company).map_or("", String::as_str)))
            .collect();
        Ok(HomeView { jobs })
    }

    pub fn dashboard(
        &self,
        caller: &Identity,
        now: DateTime<Utc>,
    ) -> Result<DashboardView, DashboardError> {
        match caller.role {
            Role::JobSeeker => Ok(DashboardView::JobSeeker(self.seeker_overview(caller)?)),
            Role::Employer => Ok(DashboardView::Employer(self.employer_overview(caller, now)?)),
            Role::Admin => Ok(DashboardView::Admin(self.admin_overview(now)?)),
        }
    }

    fn seeker_overview(&self, caller: &Identity) -> Result<SeekerOverview, DashboardError> {
        let names = self.company_names()?;
        let mut recent_applications = Vec::new();
        for application in self
            .applications
            .list_applications_by_applicant(caller.id)?
            .into_iter()
            .take(RECENT_LIMIT)
        {
            let (job_title, company) = match self.jobs.find_job(application.job)? {
                Some(job) => (
                    job.title.clone(),
                    names.get(&job.company).cloned().unwrap_or_default(),
                ),
                None => (String::new(), String::new()),
            };
            recent_applications.push(ApplicationView {
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

        Ok(SeekerOverview {
            recent_applications,
            saved_jobs: self.saved_jobs.count_saved_jobs_for(caller.id)?,
        })
    }

    pub fn employer_overview(
        &self,
        caller: &Identity,
        now: DateTime<Utc>,
    ) -> Result<EmployerOverview, DashboardError> {
        let own_jobs = self.jobs.list_jobs_owned_by(caller.id)?;

        let mut jobs = Vec::with_capacity(own_jobs.len());
        let mut total_applications = 0;
        let mut active_jobs = 0;
        let mut own_applications: Vec<Application> = Vec::new();
        for job in &own_jobs {
            let mut applications = self.applications.list_applications_for_job(job.id)?;
            total_applications += applications.len();
            if job.is_open(now) {
                active_jobs += 1;
            }
            jobs.push(EmployerJobRow {
                id: job.id,
                title: job.title.clone(),
                is_active: job.is_active,
                is_expired: job.is_expired(now),
                application_deadline: job.application_deadline,
                applications: applications.len(),
                created_at: job.created_at,
            });
            own_applications.append(&mut applications);
        }

        Ok(EmployerOverview {
            jobs,
            total_applications,
            active_jobs,
            unread_notifications: self.notifications.count_unread_notifications(caller.id)?,
            status_breakdown: status_breakdown(&own_applications),
        })
    }

    fn admin_overview(&self, now: DateTime<Utc>) -> Result<AdminOverview, DashboardError> {
        let week_ago = now - Duration::days(7);
        let identities = self.identities.list_identities()?;
        let jobs = self.jobs.list_jobs()?;
        let applications = self.applications.list_applications()?;
        let companies = self.companies.list_companies()?;
        let names: HashMap<CompanyId, String> = companies
            .iter()
            .map(|company| (company.id, company.name.clone()))
            .collect();

        let count_role =
            |role: Role| identities.iter().filter(|identity| identity.role == role).count();

        let recent_users = identities
            .iter()
            .take(RECENT_LIMIT)
            .map(|identity| RecentUser {
                id: identity.id,
                username: identity.username.clone(),
                role: identity.role.label(),
                joined_at: identity.joined_at,
            })
            .collect();
        let recent_jobs = jobs
            .iter()
            .take(RECENT_LIMIT)
            .map(|job| RecentJob {
                id: job.id,
                title: job.title.clone(),
                company: names.get(&job.company).cloned().unwrap_or_default(),
                created_at: job.created_at,
            })
            .collect();
        let mut recent_applications = Vec::new();
        for application in applications.iter().take(RECENT_LIMIT) {
            let job_title = self
                .jobs
                .find_job(application.job)?
                .map(|job| job.title)
                .unwrap_or_default();
            let applicant = self
                .identities
                .find_identity(application.applicant)?
                .map(|identity| identity.username)
                .unwrap_or_default();
            recent_applications.push(RecentApplication {
                id: application.id,
                job_title,
                applicant,
                status: application.status.label(),
                applied_at: application.applied_at,
            });
        }

        Ok(AdminOverview {
            total_users: identities.len(),
            total_jobs: jobs.len(),
            total_applications: applications.len(),
            total_companies: companies.len(),
            job_seekers: count_role(Role::JobSeeker),
            employers: count_role(Role::Employer),
            admins: count_role(Role::Admin),
            new_users_week: identities
                .iter()
                .filter(|identity| identity.joined_at >= week_ago)
                .count(),
            new_jobs_week: jobs.iter().filter(|job| job.created_at >= week_ago).count(),
            new_applications_week: applications
                .iter()
                .filter(|application| application.applied_at >= week_ago)
                .count(),
            active_jobs: jobs.iter().filter(|job| job.is_active).count(),
            expired_jobs: jobs.iter().filter(|job| job.is_expired(now)).count(),
            status_breakdown: status_breakdown(&applications),
            recent_users,
            recent_jobs,
            recent_applications,
        })
    }

    fn company_names(&self) -> Result<HashMap<CompanyId, String>, DashboardError> {
        Ok(self
            .companies
            .list_companies()?
            .into_iter()
            .map(|company| (company.id, company.name))
            .collect())
    }
}

/// Per-status counts in declaration order, zero-count statuses omitted.
fn status_breakdown(applications: &[Application]) -> Vec<StatusCount> {
    ApplicationStatus::ALL
        .iter()
        .filter_map(|status| {
            let count = applications
                .iter()
                .filter(|application| application.status == *status)
                .count();
            (count > 0).then_some(StatusCount {
                status: status.label(),
                count,
            })
        })
        .collect()
}

pub(crate) fn routes() -> Router<Arc<Portal>> {
    Router::new()
        .route("/api/v1/home", get(home))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/employer/dashboard", get(employer_dashboard))
}

async fn home(State(portal): State<Arc<Portal>>) -> Result<impl IntoResponse, DashboardError> {
    Ok(Json(portal.dashboard.home()?))
}

async fn dashboard(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, DashboardError> {
    let caller = portal.guard.authenticate(&headers)?;
    Ok(Json(portal.dashboard.dashboard(&caller, Utc::now())?))
}

async fn employer_dashboard(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, DashboardError> {
    let caller = portal.guard.require(&headers, Role::Employer)?;
    Ok(Json(
        portal.dashboard.employer_overview(&caller, Utc::now())?,
    ))
}
