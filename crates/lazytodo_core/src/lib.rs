//! Core domain logic for LazyTodo.
//! This crate is the single source of truth for auth, todo and reminder
//! invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod response;
pub mod service;
pub mod store;

pub use app::{AppAuthService, AppContext, AppTodoService};
pub use config::{AppConfig, ConfigError, ConfigResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{Priority, Reminder, Todo, TodoDraft, TodoId, TodoPatch};
pub use model::user::{Session, SessionUser, User, UserId};
pub use model::validation::ValidationError;
pub use reminder::{
    ensure_permission, Clock, ManualClock, MemoryNotifier, Notification, Notifier, Permission,
    Reconciled, ReminderScheduler, ReminderSettings, ScheduleOutcome, SweepOutcome, SystemClock,
};
pub use repo::todo_repo::{KvTodoRepository, TodoRepository};
pub use repo::user_repo::{KvUserRepository, UserRepository};
pub use response::ActionResponse;
pub use service::auth_service::{AuthError, AuthResult, AuthService};
pub use service::credentials::{CredentialVerifier, PlaintextVerifier};
pub use service::todo_service::{TickReport, TodoError, TodoResult, TodoService};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
