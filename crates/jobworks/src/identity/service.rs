use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use super::domain::{
    EmployerProfile, Identity, JobSeekerProfile, ProfileUpdate, ProfileView, Registration, Role,
};
use super::guard::AuthError;
use super::repository::{IdentityRepository, NewIdentity};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("username is already taken")]
    UsernameTaken,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address must contain '@'")]
    InvalidEmail,
    #[error("accounts can only be registered as job seekers or employers")]
    RoleNotRegistrable,
    #[error("the {0} profile section does not match your role")]
    WrongProfileSection(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IdentityError {
    fn status(&self) -> StatusCode {
        match self {
            IdentityError::Auth(err) => err.status(),
            IdentityError::UsernameTaken => StatusCode::CONFLICT,
            IdentityError::MissingField(_)
            | IdentityError::InvalidEmail
            | IdentityError::RoleNotRegistrable
            | IdentityError::WrongProfileSection(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IdentityError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            IdentityError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Account registration and self-service profile management.
pub struct IdentityService {
    identities: Arc<dyn IdentityRepository>,
}

impl IdentityService {
    pub fn new(identities: Arc<dyn IdentityRepository>) -> Self {
        Self { identities }
    }

    /// Creates an account plus an empty role profile shell.
    ///
    /// Admin accounts are provisioned out of band, never via registration.
    pub fn register(&self, registration: Registration) -> Result<Identity, IdentityError> {
        let username = registration.username.trim();
        if username.is_empty() {
            return Err(IdentityError::MissingField("username"));
        }
        let email = registration.email.trim();
        if email.is_empty() {
            return Err(IdentityError::MissingField("email"));
        }
        if !email.contains('@') {
            return Err(IdentityError::InvalidEmail);
        }
        if registration.role == Role::Admin {
            return Err(IdentityError::RoleNotRegistrable);
        }

        let identity = match self.identities.insert_identity(NewIdentity {
            username: username.to_string(),
            email: email.to_string(),
            role: registration.role,
            phone: registration.phone,
        }) {
            Ok(identity) => identity,
            Err(StoreError::Conflict) => return Err(IdentityError::UsernameTaken),
            Err(err) => return Err(err.into()),
        };

        match identity.role {
            Role::JobSeeker => self
                .identities
                .save_job_seeker_profile(identity.id, JobSeekerProfile::default())?,
            Role::Employer => self
                .identities
                .save_employer_profile(identity.id, EmployerProfile::default())?,
            Role::Admin => {}
        }

        Ok(identity)
    }

    /// Returns the caller's profile, creating the role shell if it is missing.
    pub fn profile(&self, caller: &Identity) -> Result<ProfileView, IdentityError> {
        let (job_seeker, employer) = match caller.role {
            Role::JobSeeker => (Some(self.job_seeker_or_default(caller)?), None),
            Role::Employer => (None, Some(self.employer_or_default(caller)?)),
            Role::Admin => (None, None),
        };
        Ok(profile_view(caller, job_seeker, employer))
    }

    /// Applies a partial update to contact details and the role profile.
    pub fn update_profile(
        &self,
        caller: &Identity,
        update: ProfileUpdate,
    ) -> Result<ProfileView, IdentityError> {
        if update.job_seeker.is_some() && caller.role != Role::JobSeeker {
            return Err(IdentityError::WrongProfileSection("job_seeker"));
        }
        if update.employer.is_some() && caller.role != Role::Employer {
            return Err(IdentityError::WrongProfileSection("employer"));
        }

        let email = match update.email {
            Some(email) => {
                let email = email.trim().to_string();
                if email.is_empty() {
                    return Err(IdentityError::MissingField("email"));
                }
                if !email.contains('@') {
                    return Err(IdentityError::InvalidEmail);
                }
                email
            }
            None => caller.email.clone(),
        };
        let phone = update.phone.or_else(|| caller.phone.clone());

        let refreshed = self.identities.update_contact(caller.id, email, phone)?;
        if let Some(profile) = update.job_seeker {
            self.identities.save_job_seeker_profile(caller.id, profile)?;
        }
        if let Some(profile) = update.employer {
            self.identities.save_employer_profile(caller.id, profile)?;
        }

        self.profile(&refreshed)
    }

    fn job_seeker_or_default(&self, caller: &Identity) -> Result<JobSeekerProfile, IdentityError> {
        match self.identities.job_seeker_profile(caller.id)? {
            Some(profile) => Ok(profile),
            None => {
                let fresh = JobSeekerProfile::default();
                self.identities
                    .save_job_seeker_profile(caller.id, fresh.clone())?;
                Ok(fresh)
            }
        }
    }

    fn employer_or_default(&self, caller: &Identity) -> Result<EmployerProfile, IdentityError> {
        match self.identities.employer_profile(caller.id)? {
            Some(profile) => Ok(profile),
            None => {
                let fresh = EmployerProfile::default();
                self.identities
                    .save_employer_profile(caller.id, fresh.clone())?;
                Ok(fresh)
            }
        }
    }
}

fn profile_view(
    identity: &Identity,
    job_seeker: Option<JobSeekerProfile>,
    employer: Option<EmployerProfile>,
) -> ProfileView {
    ProfileView {
        id: identity.id,
        username: identity.username.clone(),
        email: identity.email.clone(),
        role: identity.role.label(),
        phone: identity.phone.clone(),
        joined_at: identity.joined_at,
        job_seeker,
        employer,
    }
}
