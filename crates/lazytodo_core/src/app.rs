//! Application context: one explicitly opened store shared by both state
//! managers for the lifetime of a session.
//!
//! # Invariants
//! - Services borrow the context's store; they cannot outlive it.
//! - `close` is the only teardown path and surfaces close errors.

use crate::config::AppConfig;
use crate::db::DbResult;
use crate::reminder::Clock;
use crate::repo::todo_repo::KvTodoRepository;
use crate::repo::user_repo::KvUserRepository;
use crate::service::auth_service::{AuthResult, AuthService};
use crate::service::todo_service::TodoService;
use crate::store::SqliteKvStore;
use log::info;
use std::path::Path;

pub type AppAuthService<'a> = AuthService<KvUserRepository<&'a SqliteKvStore>>;
pub type AppTodoService<'a, C> = TodoService<KvTodoRepository<&'a SqliteKvStore>, C>;

/// Opened store plus the configuration it was opened with.
pub struct AppContext {
    config: AppConfig,
    store: SqliteKvStore,
}

impl AppContext {
    /// Opens the file store resolved from `config` and `db_override`.
    pub fn open(config: AppConfig, db_override: Option<&Path>) -> DbResult<Self> {
        let db_path = config.resolve_db_path(db_override);
        let store = SqliteKvStore::open(&db_path)?;
        info!("event=app_open module=app status=ok mode=file");
        Ok(Self { config, store })
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory(config: AppConfig) -> DbResult<Self> {
        let store = SqliteKvStore::open_in_memory()?;
        info!("event=app_open module=app status=ok mode=memory");
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Auth state manager with the persisted session restored.
    pub fn auth(&self) -> AuthResult<AppAuthService<'_>> {
        AuthService::new(KvUserRepository::new(&self.store))
    }

    /// Todo state manager using configured reminder settings.
    pub fn todos<C: Clock>(&self, clock: C) -> AppTodoService<'_, C> {
        TodoService::new(
            KvTodoRepository::new(&self.store),
            clock,
            self.config.reminder_settings(),
        )
    }

    pub fn close(self) -> DbResult<()> {
        self.store.close()?;
        info!("event=app_close module=app status=ok");
        Ok(())
    }
}
