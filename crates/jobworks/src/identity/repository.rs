use super::domain::{EmployerProfile, Identity, IdentityId, JobSeekerProfile, Role};
use crate::store::StoreError;

/// Insert payload; the store assigns the id and `joined_at`.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
}

/// Persistence seam for accounts and their role profiles.
///
/// `insert_identity` enforces username uniqueness and reports a duplicate as
/// [`StoreError::Conflict`]. Profile saves are upserts keyed by identity.
pub trait IdentityRepository: Send + Sync {
    fn insert_identity(&self, new: NewIdentity) -> Result<Identity, StoreError>;

    fn find_identity(&self, id: IdentityId) -> Result<Option<Identity>, StoreError>;

    fn find_identity_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError>;

    fn update_contact(
        &self,
        id: IdentityId,
        email: String,
        phone: Option<String>,
    ) -> Result<Identity, StoreError>;

    /// All accounts, newest first.
    fn list_identities(&self) -> Result<Vec<Identity>, StoreError>;

    fn job_seeker_profile(&self, id: IdentityId)
        -> Result<Option<JobSeekerProfile>, StoreError>;

    fn save_job_seeker_profile(
        &self,
        id: IdentityId,
        profile: JobSeekerProfile,
    ) -> Result<(), StoreError>;

    fn employer_profile(&self, id: IdentityId) -> Result<Option<EmployerProfile>, StoreError>;

    fn save_employer_profile(
        &self,
        id: IdentityId,
        profile: EmployerProfile,
    ) -> Result<(), StoreError>;
}
