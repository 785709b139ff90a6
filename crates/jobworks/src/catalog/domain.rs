use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::IdentityId;

/// Primary key for a company record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub u64);

/// Primary key for a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

/// Primary key for a saved-job bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SavedJobId(pub u64);

/// A hiring organization. Names need not be unique; a posting attaches to
/// the company matching the employer profile's `company_name`, created on
/// first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub description: String,
    pub website: String,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Remote => "remote",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full_time" => Some(JobType::FullTime),
            "part_time" => Some(JobType::PartTime),
            "contract" => Some(JobType::Contract),
            "internship" => Some(JobType::Internship),
            "remote" => Some(JobType::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "entry" => Some(ExperienceLevel::Entry),
            "mid" => Some(ExperienceLevel::Mid),
            "senior" => Some(ExperienceLevel::Senior),
            _ => None,
        }
    }
}

/// A job posting.
///
/// `is_active` is the employer-controlled toggle; the deadline expires a
/// posting independently of it. Seeker-facing queries require both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: CompanyId,
    pub owner: IdentityId,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    /// Whole currency units per year.
    pub salary: Option<u32>,
    pub application_deadline: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.application_deadline
    }

    /// Active and still accepting applications.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }
}

/// A seeker's bookmark on a job. One per (job, user) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: SavedJobId,
    pub job: JobId,
    pub user: IdentityId,
    pub saved_at: DateTime<Utc>,
}

/// Posting form payload, shared by create and edit.
#[derive(Debug, Clone, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub salary: Option<u32>,
    pub application_deadline: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobDraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("application deadline must be in the future")]
    DeadlinePast,
}

impl JobDraft {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), JobDraftError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("requirements", &self.requirements),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(JobDraftError::MissingField(field));
            }
        }
        if self.application_deadline <= now {
            return Err(JobDraftError::DeadlinePast);
        }
        Ok(())
    }
}

/// Company creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub logo: Option<String>,
}
