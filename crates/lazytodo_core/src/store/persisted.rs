//! Persisted envelope shapes and well-known store keys.
//!
//! Collections are stored as `{"state": ..., "version": 0}` documents so data
//! written by earlier browser builds loads unchanged.

use super::{KeyValueStore, StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Key holding the persisted session envelope.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";
/// Key holding the persisted todo list envelope.
pub const TODO_STORAGE_KEY: &str = "todo-storage";
/// Key holding the bare JSON array of registered users.
pub const USERS_KEY: &str = "users";
/// Envelope version written by this build.
pub const PERSISTED_STATE_VERSION: u32 = 0;

/// Versioned wrapper around a persisted state slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

impl<T> PersistedState<T> {
    pub fn new(state: T) -> Self {
        Self {
            state,
            version: PERSISTED_STATE_VERSION,
        }
    }
}

/// Reads and decodes the JSON value stored under `key`.
///
/// Returns `Ok(None)` when the key is absent.
pub fn read_json<S, T>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Json {
            key: key.to_string(),
            source,
        })
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn write_json<S, T>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}
