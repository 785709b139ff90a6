use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::JobId;
use crate::identity::{Identity, IdentityId};

/// Primary key for an application record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

/// Where an application sits in the hiring funnel.
///
/// Any status may move to any other; employers regularly reopen rejected
/// candidates or skip straight to an offer, so no transition graph is
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Shortlisted,
    Rejected,
    Accepted,
    InterviewScheduled,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Accepted,
        ApplicationStatus::InterviewScheduled,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
        }
    }

    /// Wording used in notification and email bodies.
    pub const fn headline(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
        }
    }

    /// Exact label match; anything else is rejected by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label() == trimmed)
    }
}

/// A seeker's application to one job. One per (job, applicant) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub applicant: IdentityId,
    pub cover_letter: String,
    /// Opaque storage key for the uploaded resume.
    pub resume: String,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    /// Applicant-visible notes.
    pub notes: String,
    /// Employer-only notes, replaced wholesale on every status update.
    pub employer_notes: String,
    pub last_status_update: DateTime<Utc>,
    /// When the applicant was last told about a status change, if ever.
    pub notified_at: Option<DateTime<Utc>>,
}

/// Submission payload for applying to a job.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationForm {
    pub cover_letter: String,
    pub resume: String,
}

/// Status transition request from the owning employer.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    /// Raw status label; validated against [`ApplicationStatus::ALL`].
    pub status: String,
    #[serde(default)]
    pub employer_notes: String,
    #[serde(default)]
    pub notify_applicant: bool,
}

/// Applicant-list filters for the owning employer. `search` is a
/// case-insensitive substring over username, email, and cover letter.
#[derive(Debug, Clone, Default)]
pub struct ApplicantFilter {
    pub status: Option<ApplicationStatus>,
    pub search: Option<String>,
}

impl ApplicantFilter {
    pub fn matches(&self, application: &Application, applicant: &Identity) -> bool {
        if let Some(status) = self.status {
            if application.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = applicant.username.to_lowercase().contains(&needle)
                || applicant.email.to_lowercase().contains(&needle)
                || application.cover_letter.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Raw query-string shape for the applicant list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantFilterParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ApplicantFilterParams {
    /// `Err` carries the unrecognized status value.
    pub fn into_filter(self) -> Result<ApplicantFilter, String> {
        let status = match self.status.map(|value| value.trim().to_string()) {
            Some(raw) if !raw.is_empty() => match ApplicationStatus::parse(&raw) {
                Some(status) => Some(status),
                None => return Err(raw),
            },
            _ => None,
        };
        Ok(ApplicantFilter {
            status,
            search: self
                .search
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        })
    }
}
