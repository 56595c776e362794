use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::contains_ignore_case;

/// Minimum title length accepted by the backend.
const MIN_TITLE_LENGTH: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "super::id_string")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub salary: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "super::lenient_optional")]
    pub posted_by: Option<String>,
}

impl Job {
    /// Whether the job matches a free-text filter on title, location or description.
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || contains_ignore_case(&self.title, query)
            || contains_ignore_case(&self.location, query)
            || contains_ignore_case(&self.description, query)
    }

    /// Salary formatted for display, e.g. `$85000.00`.
    pub fn salary_display(&self) -> String {
        if self.salary.is_empty() {
            "-".to_string()
        } else {
            format!("${}", self.salary)
        }
    }

    pub fn to_draft(&self) -> JobDraft {
        JobDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            salary: self.salary.clone(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobDraftError {
    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("Title must have at least 3 characters.")]
    TitleTooShort,

    #[error("Salary must be a positive number.")]
    InvalidSalary,
}

/// Body for creating or updating a job posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: String,
}

impl JobDraft {
    /// Check the fields the form marks as required before submitting.
    pub fn validate(&self) -> Result<(), JobDraftError> {
        let fields = [
            ("Title", &self.title),
            ("Description", &self.description),
            ("Location", &self.location),
            ("Salary", &self.salary),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(JobDraftError::MissingField(name));
        }
        if self.title.trim().chars().count() < MIN_TITLE_LENGTH {
            return Err(JobDraftError::TitleTooShort);
        }
        match self.salary.trim().parse::<f64>() {
            Ok(v) if v >= 0.0 && v.is_finite() => Ok(()),
            _ => Err(JobDraftError::InvalidSalary),
        }
    }
}
