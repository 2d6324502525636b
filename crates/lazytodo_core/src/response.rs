//! Result envelope handed to UI callers.
//!
//! # Invariants
//! - `ok == false` always carries a human-readable `message` and an error `code`.
//! - Building an envelope never panics.

use crate::service::auth_service::AuthError;
use crate::service::todo_service::TodoError;

/// Success flag plus message, as surfaced by a toast or status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Affected record id, when there is one.
    pub id: Option<String>,
    pub message: String,
    /// Stable error code on failure.
    pub code: Option<&'static str>,
}

impl ActionResponse {
    pub fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
            code: None,
        }
    }

    pub fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
            code: Some(code),
        }
    }
}

impl From<&AuthError> for ActionResponse {
    fn from(err: &AuthError) -> Self {
        Self::failure(err.code(), err.to_string())
    }
}

impl From<&TodoError> for ActionResponse {
    fn from(err: &TodoError) -> Self {
        Self::failure(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ActionResponse;
    use crate::service::auth_service::AuthError;
    use crate::service::todo_service::TodoError;

    #[test]
    fn failures_carry_code_and_message() {
        let response = ActionResponse::from(&AuthError::InvalidCredentials);
        assert!(!response.ok);
        assert_eq!(response.code, Some("invalid_credentials"));
        assert_eq!(response.message, "Invalid credentials");

        let response = ActionResponse::from(&TodoError::NotFound("t1".to_string()));
        assert_eq!(response.code, Some("not_found"));
        assert!(response.message.contains("t1"));
    }

    #[test]
    fn success_has_no_code() {
        let response = ActionResponse::success("Added", Some("t1".to_string()));
        assert!(response.ok);
        assert_eq!(response.code, None);
        assert_eq!(response.id.as_deref(), Some("t1"));
    }
}
