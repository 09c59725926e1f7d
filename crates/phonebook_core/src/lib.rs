//! Core domain logic for the phonebook contact directory.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod mirror;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StorePaths;
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::contact::{sort_key, Contact, ContactId, ContactValidationError};
pub use repo::contact_repo::{ContactRepository, RepoError, RepoResult, SqliteContactRepository};
pub use service::contact_store::{ContactStore, StoreError, StoreResult};
