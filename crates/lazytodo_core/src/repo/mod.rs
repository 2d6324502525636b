//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Map persisted JSON documents to domain collections.
//! - Keep store keys and envelope shapes out of service logic.
//!
//! # Invariants
//! - Every save rewrites the whole collection in one store write.
//! - An absent key reads as an empty collection or anonymous session.

pub mod todo_repo;
pub mod user_repo;
