use super::domain::{Company, CompanyId, Job, JobId, SavedJob};
use crate::catalog::domain::{ExperienceLevel, JobType};
use crate::identity::IdentityId;
use crate::store::StoreError;

/// Insert payload; the store assigns the id and `created_at`.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub description: String,
    pub website: String,
    pub logo: Option<String>,
}

pub trait CompanyRepository: Send + Sync {
    fn insert_company(&self, new: NewCompany) -> Result<Company, StoreError>;

    fn find_company(&self, id: CompanyId) -> Result<Option<Company>, StoreError>;

    /// Names are not unique; with several rows under one name this returns
    /// any of them.
    fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, StoreError>;

    /// All companies, newest first.
    fn list_companies(&self) -> Result<Vec<Company>, StoreError>;
}

/// Insert payload; the store assigns the id, timestamps, and starts the
/// posting active.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: CompanyId,
    pub owner: IdentityId,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub salary: Option<u32>,
    pub application_deadline: chrono::DateTime<chrono::Utc>,
}

pub trait JobRepository: Send + Sync {
    fn insert_job(&self, new: NewJob) -> Result<Job, StoreError>;

    /// Full-record replace keyed by `job.id`. Missing rows are
    /// [`StoreError::NotFound`].
    fn update_job(&self, job: Job) -> Result<(), StoreError>;

    fn find_job(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    /// Every posting regardless of state, newest first.
    fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;

    /// Postings owned by one employer, newest first.
    fn list_jobs_owned_by(&self, owner: IdentityId) -> Result<Vec<Job>, StoreError>;
}

/// Bookmarks are unique per (job, user); `insert_saved_job` reports a
/// duplicate as [`StoreError::Conflict`].
pub trait SavedJobRepository: Send + Sync {
    fn insert_saved_job(&self, job: JobId, user: IdentityId) -> Result<SavedJob, StoreError>;

    fn saved_job_exists(&self, job: JobId, user: IdentityId) -> Result<bool, StoreError>;

    /// Returns whether a bookmark was actually removed.
    fn delete_saved_job(&self, job: JobId, user: IdentityId) -> Result<bool, StoreError>;

    /// One seeker's bookmarks, newest first.
    fn list_saved_jobs_for(&self, user: IdentityId) -> Result<Vec<SavedJob>, StoreError>;

    fn count_saved_jobs_for(&self, user: IdentityId) -> Result<usize, StoreError>;
}
