//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the auth and todo state managers.
//! - Drive reminder scheduling from todo mutations.
//! - Keep UI callers decoupled from storage details.

pub mod auth_service;
pub mod credentials;
pub mod todo_service;
