//! Data models for job board entities.
//!
//! This module contains the records exchanged with the backend:
//!
//! - `Job`, `JobDraft`: postings and the body used to create or edit them
//! - `Application`, `NewApplication`: a user's applications to postings
//! - `Profile`, `ProfileUpdate`: the signed-in user's profile
//! - `SignupForm`: account registration with client-side validation

pub mod account;
pub mod application;
pub mod job;
pub mod profile;

pub use account::{Role, SignupError, SignupForm};
pub use application::{has_applied, Application, ApplicationStatus, NewApplication};
pub use job::{Job, JobDraft, JobDraftError};
pub use profile::{Profile, ProfileUpdate};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an identifier that the backend may send as a number or a string.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Deserialize a value that may be null or missing into its default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a value that may be a string, a number or null into a string.
/// Decimal fields arrive as strings, but older endpoints send plain numbers.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        None | Some(Value::Null) => Ok(String::new()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Like `lenient_string`, but keeps null and missing values as `None`.
pub(crate) fn lenient_optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}
