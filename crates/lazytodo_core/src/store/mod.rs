//! Durable string-keyed storage shared by the auth and todo state managers.
//!
//! # Responsibility
//! - Define the synchronous `KeyValueStore` contract.
//! - Provide SQLite-backed and in-memory implementations.
//! - Provide JSON read/write helpers for the persisted envelopes.
//!
//! # Invariants
//! - A `set` is durable once it returns `Ok`.
//! - Readers never observe a partially written value.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod persisted;
mod sqlite;

pub use memory::MemoryKvStore;
pub use persisted::{
    read_json, write_json, PersistedState, AUTH_STORAGE_KEY, PERSISTED_STATE_VERSION,
    TODO_STORAGE_KEY, USERS_KEY,
};
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by key-value store implementations and JSON helpers.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Stored value under `key` could not be decoded or encoded as JSON.
    Json {
        key: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json { key, source } => write!(f, "invalid JSON under `{key}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string-keyed storage surviving process restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Removes `key`; returns whether an entry existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        (**self).remove(key)
    }
}
