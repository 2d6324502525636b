//! Domain model for users, sessions and todos.
//!
//! # Responsibility
//! - Define the records owned by the auth and todo state managers.
//! - Keep persisted field names compatible with stored JSON documents.
//!
//! # Invariants
//! - Identifiers are opaque, time-derived strings and never reused.
//! - Deletion is a hard delete; there are no tombstones.

pub mod todo;
pub mod user;
pub mod validation;

use uuid::Uuid;

/// Generates a new opaque, time-ordered identifier.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}
