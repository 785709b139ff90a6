use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key for an identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub u64);

/// Closed set of roles an identity can hold.
///
/// Every role-gated operation goes through [`crate::identity::Guard`], which
/// compares against this enum; handlers never inspect raw role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Employer,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::JobSeeker => "job_seeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }

    /// Human wording used in authorization error messages.
    pub const fn describe(self) -> &'static str {
        match self {
            Role::JobSeeker => "job seeker",
            Role::Employer => "employer",
            Role::Admin => "administrator",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "job_seeker" => Some(Role::JobSeeker),
            "employer" => Some(Role::Employer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// An account known to the portal. Usernames are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// Seeker-side profile attached 1:1 to a job seeker identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerProfile {
    /// Opaque storage key for the uploaded resume, if any.
    pub resume: Option<String>,
    pub skills: String,
    pub experience: String,
    pub education: String,
}

/// Employer-side profile attached 1:1 to an employer identity.
///
/// `company_name` doubles as the key used to attach posted jobs to a
/// [`crate::catalog::Company`]; a job cannot be posted until it is filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub company_name: String,
    pub company_description: String,
    pub company_website: String,
    pub company_logo: Option<String>,
    pub company_size: String,
    pub industry: String,
}

/// Payload for creating a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Partial update applied to the caller's own account and role profile.
///
/// The role-specific section must match the caller's role; sending the wrong
/// one is a validation failure rather than a silent drop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub job_seeker: Option<JobSeekerProfile>,
    #[serde(default)]
    pub employer: Option<EmployerProfile>,
}

/// Wire shape for an account without profile details.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityView {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub role: &'static str,
    pub phone: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl IdentityView {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role.label(),
            phone: identity.phone.clone(),
            joined_at: identity.joined_at,
        }
    }
}

/// Account plus whichever role profile applies. Admins carry no profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub role: &'static str,
    pub phone: Option<String>,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_seeker: Option<JobSeekerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer: Option<EmployerProfile>,
}
