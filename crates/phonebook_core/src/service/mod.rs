//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and mirror regeneration into use-case APIs.
//! - Keep the CLI decoupled from storage details.

pub mod contact_store;
