//! Directory database: connection setup and the `contacts` schema.
//!
//! # Responsibility
//! - Open the one SQLite file backing the phonebook and configure it.
//! - Build the `contacts` table if it is absent, or rebuild it on reset.
//!
//! # Invariants
//! - The schema level lives in `PRAGMA user_version`; 0 means "no schema yet".
//! - A failing schema step rolls back as a whole and names its version.
//! - Rows are never touched before the schema step has committed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use migrations::reset_schema;
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening the directory database or shaping its schema.
#[derive(Debug)]
pub enum DbError {
    /// Plain SQLite failure outside any schema step.
    Sqlite(rusqlite::Error),
    /// Schema step `version` could not be applied; nothing from it was kept.
    SchemaStep {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer phonebook build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Schema version the error relates to, if any.
    pub fn schema_version(&self) -> Option<u32> {
        match self {
            Self::Sqlite(_) => None,
            Self::SchemaStep { version, .. } => Some(*version),
            Self::UnsupportedSchemaVersion { db_version, .. } => Some(*db_version),
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaStep { version, source } => {
                write!(f, "contacts schema step {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "directory database uses schema {db_version}, this build knows up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::SchemaStep { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
