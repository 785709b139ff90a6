//! Job catalog: postings, companies, bookmarks, and the browse surface.

pub mod domain;
pub mod repository;
pub mod router;
pub mod search;
pub mod service;

pub use domain::{
    Company, CompanyForm, CompanyId, ExperienceLevel, Job, JobDraft, JobDraftError, JobId,
    JobType, SavedJob, SavedJobId,
};
pub use repository::{CompanyRepository, JobRepository, NewCompany, NewJob, SavedJobRepository};
pub use search::{FilterError, JobFilter, JobFilterParams};
pub use service::{
    job_summary, CatalogError, CatalogService, JobDetailView, JobListView, JobSummaryView,
    SaveOutcome, SavedJobView,
};
