//! Domain model for the contact directory.
//!
//! # Responsibility
//! - Define the canonical contact record and its input validation.
//! - Own the display sort-key rule shared by SQL and Rust callers.
//!
//! # Invariants
//! - `name` is the natural key; at most one contact exists per exact name.
//! - Contacts are never updated in place.

pub mod contact;
