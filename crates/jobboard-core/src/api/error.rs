use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - credentials rejected or token expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Field order used when picking a validation message to show the user.
const PREFERRED_FIELDS: &[&str] = &["username", "email", "password", "non_field_errors", "detail"];

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 => ApiError::BadRequest(truncated),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// First human-readable message from a validation error body.
    ///
    /// The backend reports validation failures as `{"field": ["message", ...]}`,
    /// `{"non_field_errors": [...]}`, `{"detail": "..."}` or a bare list.
    /// Known fields are checked in a fixed order before falling back to any
    /// other field.
    pub fn field_message(&self) -> Option<String> {
        let ApiError::BadRequest(body) = self else {
            return None;
        };
        let value: Value = serde_json::from_str(body).ok()?;
        match &value {
            Value::Object(map) => PREFERRED_FIELDS
                .iter()
                .find_map(|field| map.get(*field).and_then(first_message))
                .or_else(|| map.values().find_map(first_message)),
            other => first_message(other),
        }
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(ApiError::from_status(StatusCode::UNAUTHORIZED, ""), ApiError::Unauthorized));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_REQUEST, "{}"), ApiError::BadRequest(_)));
        assert!(matches!(ApiError::from_status(StatusCode::NOT_FOUND, ""), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""), ApiError::RateLimited));
        assert!(matches!(ApiError::from_status(StatusCode::BAD_GATEWAY, ""), ApiError::ServerError(_)));
        assert!(matches!(ApiError::from_status(StatusCode::IM_A_TEAPOT, ""), ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.contains("510 total bytes"));
        assert_eq!(ApiError::truncate_body("short"), "short");
    }

    #[test]
    fn test_field_message_prefers_username() {
        let err = ApiError::BadRequest(
            r#"{"password": ["Too common."], "username": ["A user with that username already exists."]}"#.to_string(),
        );
        assert_eq!(
            err.field_message().as_deref(),
            Some("A user with that username already exists.")
        );
    }

    #[test]
    fn test_field_message_non_field_errors() {
        let err = ApiError::BadRequest(
            r#"{"non_field_errors": ["You have already applied to this job."]}"#.to_string(),
        );
        assert_eq!(
            err.field_message().as_deref(),
            Some("You have already applied to this job.")
        );

        let bare = ApiError::BadRequest(r#"["Salary must be positive."]"#.to_string());
        assert_eq!(bare.field_message().as_deref(), Some("Salary must be positive."));
    }

    #[test]
    fn test_field_message_none_for_other_errors() {
        assert!(ApiError::Unauthorized.field_message().is_none());
        assert!(ApiError::BadRequest("not json".to_string()).field_message().is_none());
    }
}
