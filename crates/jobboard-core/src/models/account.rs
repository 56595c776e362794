use serde::Serialize;
use thiserror::Error;

/// Minimum password length for signup.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum username length for signup.
const MIN_USERNAME_LENGTH: usize = 3;

/// Special characters a signup password must include at least one of.
const PASSWORD_SPECIALS: &str = "!@#$%^&*";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Seeker,
    Recruiter,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignupError {
    #[error("Password must have at least 8 chars, include upper and lowercase letters, numbers, and special chars.")]
    WeakPassword,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Provide a valid email.")]
    InvalidEmail,

    #[error("Username must have at least 3 characters.")]
    UsernameTooShort,
}

/// Account registration body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
    pub role: Role,
}

impl SignupForm {
    /// Validate the form before submitting. Checks run in a fixed order and the
    /// first failing rule is reported.
    pub fn validate(&self) -> Result<(), SignupError> {
        if !is_strong_password(&self.password) {
            return Err(SignupError::WeakPassword);
        }
        if self.password != self.password2 {
            return Err(SignupError::PasswordMismatch);
        }
        if !self.email.contains('@') {
            return Err(SignupError::InvalidEmail);
        }
        if self.username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(SignupError::UsernameTooShort);
        }
        Ok(())
    }
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignupForm {
        SignupForm {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Secr3t!pw".to_string(),
            password2: "Secr3t!pw".to_string(),
            role: Role::Seeker,
        }
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(form().validate(), Ok(()));
    }

    #[test]
    fn test_weak_passwords() {
        for weak in ["Sh0rt!", "nouppercase1!", "NOLOWERCASE1!", "NoDigits!!", "NoSpecial123"] {
            let mut f = form();
            f.password = weak.to_string();
            f.password2 = weak.to_string();
            assert_eq!(f.validate(), Err(SignupError::WeakPassword), "{}", weak);
        }
    }

    #[test]
    fn test_rules_checked_in_order() {
        let mut f = form();
        f.password2 = "Different1!".to_string();
        f.email = "invalid".to_string();
        assert_eq!(f.validate(), Err(SignupError::PasswordMismatch));

        let mut f = form();
        f.email = "invalid".to_string();
        f.username = "al".to_string();
        assert_eq!(f.validate(), Err(SignupError::InvalidEmail));

        let mut f = form();
        f.username = "al".to_string();
        assert_eq!(f.validate(), Err(SignupError::UsernameTooShort));
    }

    #[test]
    fn test_signup_body_includes_role() {
        let body = serde_json::to_value(form()).expect("serialize");
        assert_eq!(body["role"], "seeker");
        assert_eq!(body["password2"], "Secr3t!pw");
    }
}
