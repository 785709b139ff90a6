use serde::Deserialize;
use thiserror::Error;

use super::domain::{ExperienceLevel, Job, JobType};

/// Seeker-facing listing filters. Criteria are ANDed together; the free-text
/// `query` ORs across title, description, requirements, and company name.
/// All text matching is case-insensitive substring containment.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub query: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job, company_name: &str) -> bool {
        if let Some(query) = &self.query {
            let hit = contains_ci(&job.title, query)
                || contains_ci(&job.description, query)
                || contains_ci(&job.requirements, query)
                || contains_ci(company_name, query);
            if !hit {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ci(&job.location, location) {
                return false;
            }
        }
        if let Some(job_type) = self.job_type {
            if job.job_type != job_type {
                return false;
            }
        }
        if let Some(level) = self.experience_level {
            if job.experience_level != level {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

/// Raw query-string shape. Blank strings count as "no filter" so that empty
/// form fields do not exclude everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilterParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

impl JobFilterParams {
    pub fn into_filter(self) -> Result<JobFilter, FilterError> {
        let job_type = match normalize(self.job_type) {
            Some(raw) => Some(JobType::parse(&raw).ok_or(FilterError::UnknownValue {
                field: "job_type",
                value: raw,
            })?),
            None => None,
        };
        let experience_level = match normalize(self.experience_level) {
            Some(raw) => {
                Some(
                    ExperienceLevel::parse(&raw).ok_or(FilterError::UnknownValue {
                        field: "experience_level",
                        value: raw,
                    })?,
                )
            }
            None => None,
        };
        Ok(JobFilter {
            query: normalize(self.query),
            location: normalize(self.location),
            job_type,
            experience_level,
        })
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
