//! Accounts, role profiles, and the request authentication boundary.

pub mod domain;
pub mod guard;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    EmployerProfile, Identity, IdentityId, IdentityView, JobSeekerProfile, ProfileUpdate,
    ProfileView, Registration, Role,
};
pub use guard::{AuthError, Guard, IDENTITY_HEADER};
pub use repository::{IdentityRepository, NewIdentity};
pub use service::{IdentityError, IdentityService};
