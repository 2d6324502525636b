//! Auth state manager.
//!
//! # Responsibility
//! - Register and log in users against the persisted user list.
//! - Own the current session and mirror it to storage on every change.
//!
//! # Invariants
//! - `email` is unique across registered users.
//! - A failed register or login leaves stored users and the session as they
//!   were; a failed session write after registration restores the user list.
//! - Credential checks always go through the configured `CredentialVerifier`.

use crate::model::new_id;
use crate::model::user::{Session, SessionUser, User};
use crate::model::validation::{validate_registration, ValidationError};
use crate::repo::user_repo::UserRepository;
use crate::service::credentials::{CredentialVerifier, PlaintextVerifier};
use crate::store::StoreError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult<T> = Result<T, AuthError>;

/// Auth use-case error.
#[derive(Debug)]
pub enum AuthError {
    /// Registration email is already taken.
    DuplicateUser,
    /// No stored user matches the presented email and password.
    InvalidCredentials,
    Validation(ValidationError),
    Store(StoreError),
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateUser => "duplicate_user",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Validation(_) => "validation_error",
            Self::Store(_) => "store_error",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUser => write!(f, "User already exists"),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::DuplicateUser | Self::InvalidCredentials => None,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Session-owning auth service over a user repository.
pub struct AuthService<R: UserRepository, V: CredentialVerifier = PlaintextVerifier> {
    repo: R,
    verifier: V,
    session: Session,
}

impl<R: UserRepository> AuthService<R, PlaintextVerifier> {
    /// Restores the persisted session using the plaintext verifier.
    pub fn new(repo: R) -> AuthResult<Self> {
        Self::restore(repo, PlaintextVerifier)
    }
}

impl<R: UserRepository, V: CredentialVerifier> AuthService<R, V> {
    /// Creates a service whose session is loaded from storage.
    pub fn restore(repo: R, verifier: V) -> AuthResult<Self> {
        let session = repo.load_session()?;
        info!(
            "event=auth_restore module=auth status=ok authenticated={}",
            session.is_authenticated
        );
        Ok(Self {
            repo,
            verifier,
            session,
        })
    }

    /// Registers a new account and signs it in.
    ///
    /// # Errors
    /// - `Validation` for an empty name/password or malformed email.
    /// - `DuplicateUser` when `email` is already registered.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> AuthResult<Session> {
        validate_registration(name, email, password)?;

        let mut users = self.repo.load_users()?;
        if users.iter().any(|user| user.email == email) {
            warn!("event=auth_register module=auth status=error error_code=duplicate_user");
            return Err(AuthError::DuplicateUser);
        }

        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            password: self.verifier.seal(password),
        };
        let session = Session::authenticated(user.to_session_user());
        let previous = users.clone();
        users.push(user);
        self.repo.save_users(&users)?;
        if let Err(err) = self.set_session(session) {
            if self.repo.save_users(&previous).is_err() {
                error!("event=auth_register module=auth status=error error_code=rollback_failed");
            }
            warn!("event=auth_register module=auth status=error error_code=store_error");
            return Err(err);
        }

        info!(
            "event=auth_register module=auth status=ok user_count={}",
            users.len()
        );
        Ok(self.session.clone())
    }

    /// Signs in an existing account.
    ///
    /// # Errors
    /// - `InvalidCredentials` when no stored user matches both fields.
    pub fn login(&mut self, email: &str, password: &str) -> AuthResult<Session> {
        let users = self.repo.load_users()?;
        let Some(user) = users
            .iter()
            .find(|user| user.email == email && self.verifier.verify(&user.password, password))
        else {
            warn!("event=auth_login module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };

        self.set_session(Session::authenticated(user.to_session_user()))?;
        info!("event=auth_login module=auth status=ok");
        Ok(self.session.clone())
    }

    /// Clears the session; registered users are untouched.
    pub fn logout(&mut self) -> AuthResult<()> {
        self.set_session(Session::anonymous())?;
        info!("event=auth_logout module=auth status=ok");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    fn set_session(&mut self, session: Session) -> AuthResult<()> {
        self.repo.save_session(&session)?;
        self.session = session;
        Ok(())
    }
}
