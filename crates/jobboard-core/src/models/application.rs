use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Job;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Viewed,
    Rejected,
    Accepted,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Applied => write!(f, "Applied"),
            ApplicationStatus::Viewed => write!(f, "Viewed"),
            ApplicationStatus::Rejected => write!(f, "Rejected"),
            ApplicationStatus::Accepted => write!(f, "Accepted"),
            ApplicationStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    pub job: Job,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub cover_letter: String,
}

/// Body for applying to a job.
#[derive(Debug, Clone, Serialize)]
pub struct NewApplication {
    pub job_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cover_letter: String,
}

impl NewApplication {
    pub fn new(job_id: impl Into<String>, cover_letter: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            cover_letter: cover_letter.into(),
        }
    }
}

/// Whether any of the applications targets the given job.
pub fn has_applied(applications: &[Application], job_id: &str) -> bool {
    applications.iter().any(|a| a.job.id == job_id)
}
