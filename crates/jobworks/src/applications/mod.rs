//! Applications and the employer-driven status transition workflow.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantFilter, ApplicantFilterParams, Application, ApplicationForm, ApplicationId,
    ApplicationStatus, StatusUpdateRequest,
};
pub use repository::{ApplicationRepository, NewApplication};
pub use service::{
    ApplicantListView, ApplicantRow, ApplicationDetailView, ApplicationError, ApplicationService,
    ApplicationView, StatusUpdateOutcome,
};
