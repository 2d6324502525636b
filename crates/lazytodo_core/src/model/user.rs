//! User and session records.
//!
//! # Invariants
//! - `User::email` is unique across the persisted user list.
//! - `Session::is_authenticated` is true iff `Session::user` is present.
//! - Passwords never leave `User`; sessions carry only public fields.

use serde::{Deserialize, Serialize};

/// Opaque user identifier.
pub type UserId = String;

/// Registered account as stored under the `users` key.
///
/// Passwords are kept in plaintext; see `PlaintextVerifier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Public projection carried by a session.
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public subset of `User` held by an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Current authentication state, persisted under `auth-storage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: SessionUser) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    /// Re-derives `is_authenticated` from `user` after loading stored data.
    pub fn normalized(mut self) -> Self {
        self.is_authenticated = self.user.is_some();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionUser, User};

    #[test]
    fn session_serializes_with_camel_case_flag_and_null_user() {
        let json = serde_json::to_value(Session::anonymous()).unwrap();
        assert_eq!(json["isAuthenticated"], false);
        assert!(json["user"].is_null());
    }

    #[test]
    fn session_user_drops_password() {
        let user = User {
            id: "1".to_string(),
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(Session::authenticated(user.to_session_user())).unwrap();
        assert_eq!(json["user"]["email"], "a@x.com");
        assert!(json["user"].get("password").is_none());
    }

    #[test]
    fn normalized_repairs_inconsistent_flag() {
        let stale = Session {
            user: None,
            is_authenticated: true,
        };
        assert!(!stale.normalized().is_authenticated);

        let missing_flag = Session {
            user: Some(SessionUser {
                id: "1".to_string(),
                name: "Ann".to_string(),
                email: "a@x.com".to_string(),
            }),
            is_authenticated: false,
        };
        assert!(missing_flag.normalized().is_authenticated);
    }
}
