//! Input validation shared by auth and todo use-cases.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("valid email regex"));

/// Rejected user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyTitle,
    EmptyName,
    InvalidEmail,
    EmptyPassword,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Title is required"),
            Self::EmptyName => write!(f, "Name is required"),
            Self::InvalidEmail => write!(f, "A valid email is required"),
            Self::EmptyPassword => write!(f, "Password is required"),
        }
    }
}

impl Error for ValidationError {}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

/// Checks registration input shape. Values are compared later as given.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_registration, validate_title, ValidationError};

    #[test]
    fn whitespace_title_is_rejected() {
        assert_eq!(validate_title("   "), Err(ValidationError::EmptyTitle));
        assert!(validate_title("Buy milk").is_ok());
    }

    #[test]
    fn registration_checks_each_field() {
        assert_eq!(
            validate_registration("", "a@x.com", "pw"),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_registration("Ann", "not-an-email", "pw"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_registration("Ann", "a @x.com", "pw"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_registration("Ann", "a@x.com", ""),
            Err(ValidationError::EmptyPassword)
        );
        assert!(validate_registration("Ann", "a@x.com", "pw").is_ok());
    }
}
