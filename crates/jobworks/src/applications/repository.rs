use super::domain::{Application, ApplicationId};
use crate::catalog::JobId;
use crate::identity::IdentityId;
use crate::store::StoreError;

/// Insert payload. The store assigns the id and timestamps and starts the
/// record at `submitted` with empty notes.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job: JobId,
    pub applicant: IdentityId,
    pub cover_letter: String,
    pub resume: String,
}

/// Persistence seam for applications.
///
/// `insert_application` enforces the one-per-(job, applicant) rule and
/// reports a duplicate as [`StoreError::Conflict`].
pub trait ApplicationRepository: Send + Sync {
    fn insert_application(&self, new: NewApplication) -> Result<Application, StoreError>;

    /// Full-record replace keyed by `application.id`. Missing rows are
    /// [`StoreError::NotFound`]. No freshness check: callers doing
    /// read-then-write can overwrite a concurrent update, and two racing
    /// status changes may both audit the same old status.
    fn update_application(&self, application: Application) -> Result<(), StoreError>;

    fn find_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError>;

    fn has_applied(&self, job: JobId, applicant: IdentityId) -> Result<bool, StoreError>;

    /// Applications to one job, newest first.
    fn list_applications_for_job(&self, job: JobId) -> Result<Vec<Application>, StoreError>;

    /// One seeker's applications, newest first.
    fn list_applications_by_applicant(
        &self,
        applicant: IdentityId,
    ) -> Result<Vec<Application>, StoreError>;

    fn count_applications_for_job(&self, job: JobId) -> Result<usize, StoreError>;

    /// Every application in the store, newest first.
    fn list_applications(&self) -> Result<Vec<Application>, StoreError>;
}
