//! User list and session persistence.

use crate::model::user::{Session, User};
use crate::store::{
    read_json, write_json, KeyValueStore, PersistedState, StoreResult, AUTH_STORAGE_KEY,
    USERS_KEY,
};

/// Repository interface for registered users and the current session.
pub trait UserRepository {
    fn load_users(&self) -> StoreResult<Vec<User>>;
    fn save_users(&self, users: &[User]) -> StoreResult<()>;
    fn load_session(&self) -> StoreResult<Session>;
    fn save_session(&self, session: &Session) -> StoreResult<()>;
}

/// Key-value backed user repository.
///
/// Users live as a bare JSON array under `users`; the session lives in a
/// versioned envelope under `auth-storage`.
pub struct KvUserRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvUserRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> UserRepository for KvUserRepository<S> {
    fn load_users(&self) -> StoreResult<Vec<User>> {
        Ok(read_json(&self.store, USERS_KEY)?.unwrap_or_default())
    }

    fn save_users(&self, users: &[User]) -> StoreResult<()> {
        write_json(&self.store, USERS_KEY, users)
    }

    fn load_session(&self) -> StoreResult<Session> {
        let persisted: Option<PersistedState<Session>> = read_json(&self.store, AUTH_STORAGE_KEY)?;
        Ok(persisted
            .map(|envelope| envelope.state.normalized())
            .unwrap_or_default())
    }

    fn save_session(&self, session: &Session) -> StoreResult<()> {
        write_json(
            &self.store,
            AUTH_STORAGE_KEY,
            &PersistedState::new(session.clone()),
        )
    }
}
