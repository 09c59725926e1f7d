//! Contact store use-case service.
//!
//! # Responsibility
//! - Own the single SQLite connection and the text mirror location.
//! - Provide add/remove/list/reset entry points for the CLI.
//! - Regenerate the full text mirror after every mutation.
//!
//! # Invariants
//! - After every successful mutation the mirror lines equal a fresh `list()`.
//! - Rejected adds (duplicate name, invalid input) leave table and mirror
//!   untouched.
//! - `remove` regenerates the mirror whether or not a row matched.
//! - Logs carry ids and counts only, never names or phone numbers.

use crate::config::StorePaths;
use crate::db::{open_db, reset_schema};
use crate::mirror::write_mirror;
use crate::model::contact::{Contact, ContactValidationError};
use crate::repo::contact_repo::{ContactRepository, RepoError, SqliteContactRepository};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy for store operations.
///
/// `CreateDir` and `Unavailable` are only produced by
/// [`ContactStore::initialize`]; callers usually treat them as fatal.
#[derive(Debug)]
pub enum StoreError {
    /// A storage directory was missing and could not be created.
    CreateDir { path: PathBuf, source: io::Error },
    /// The database could not be opened or its schema could not be created.
    Unavailable(RepoError),
    Validation(ContactValidationError),
    DuplicateName(String),
    NotFound(String),
    Repo(RepoError),
    Mirror(io::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDir { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
            Self::Unavailable(err) => write!(f, "contact store unavailable: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "the name '{name}' already exists"),
            Self::NotFound(name) => write!(f, "name '{name}' not found"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Mirror(err) => write!(f, "failed to update text file: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Unavailable(err) | Self::Repo(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Mirror(err) => Some(err),
            Self::DuplicateName(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateName(name) => Self::DuplicateName(name),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Durable contact storage with a synchronized plain-text mirror.
pub struct ContactStore {
    conn: Connection,
    db_path: PathBuf,
    mirror_path: PathBuf,
}

impl ContactStore {
    /// Opens (or creates) the store and refreshes the mirror.
    ///
    /// Missing parent directories of both paths are created. Existing
    /// contacts are kept.
    ///
    /// # Errors
    /// - `CreateDir` when a parent directory cannot be created.
    /// - `Unavailable` when the database cannot be opened or its schema
    ///   cannot be created or verified.
    /// - `Mirror` when the initial mirror cannot be written.
    pub fn initialize(
        db_path: impl AsRef<Path>,
        mirror_path: impl AsRef<Path>,
    ) -> StoreResult<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        let mirror_path = mirror_path.as_ref().to_path_buf();

        ensure_parent_dir(&db_path, "database")?;
        ensure_parent_dir(&mirror_path, "text_file")?;

        let conn = open_db(&db_path).map_err(|err| StoreError::Unavailable(err.into()))?;
        SqliteContactRepository::try_new(&conn).map_err(StoreError::Unavailable)?;

        let store = Self {
            conn,
            db_path,
            mirror_path,
        };
        store.regenerate_mirror()?;

        info!(
            "event=store_init module=service status=ok contacts={}",
            store.repo()?.count()?
        );
        Ok(store)
    }

    /// Same as [`ContactStore::initialize`] using a [`StorePaths`] bundle.
    pub fn with_paths(paths: &StorePaths) -> StoreResult<Self> {
        Self::initialize(&paths.db_path, &paths.mirror_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn mirror_path(&self) -> &Path {
        &self.mirror_path
    }

    /// Inserts a new contact and regenerates the mirror.
    ///
    /// Returns `DuplicateName` without touching any state when `name` exists.
    pub fn add(&self, name: &str, phone: &str) -> StoreResult<Contact> {
        let contact = match self.repo()?.insert_contact(name, phone) {
            Ok(contact) => contact,
            Err(err) => {
                let err = StoreError::from(err);
                warn!(
                    "event=contact_add module=service status=rejected error_code={}",
                    error_code(&err)
                );
                return Err(err);
            }
        };

        info!(
            "event=contact_add module=service status=ok contact_id={}",
            contact.id
        );
        self.regenerate_mirror()?;
        Ok(contact)
    }

    /// Deletes the contact named exactly `name` and regenerates the mirror.
    ///
    /// The mirror is rewritten even when nothing matched. Returns the number
    /// of removed contacts (always 1) or `NotFound`. `NotFound` takes
    /// precedence over a failed mirror rewrite, which is only logged then.
    pub fn remove(&self, name: &str) -> StoreResult<usize> {
        let removed = self.repo()?.delete_by_name(name)?;
        let mirrored = self.regenerate_mirror();

        if removed == 0 {
            warn!("event=contact_remove module=service status=not_found");
            if let Err(err) = mirrored {
                warn!(
                    "event=contact_remove module=service status=mirror_stale error_code={} error={}",
                    error_code(&err),
                    err
                );
            }
            return Err(StoreError::NotFound(name.to_string()));
        }
        mirrored?;

        info!(
            "event=contact_remove module=service status=ok removed={}",
            removed
        );
        Ok(removed)
    }

    /// Returns all contacts ordered by last-name sort key, then name.
    pub fn list(&self) -> StoreResult<Vec<Contact>> {
        Ok(self.repo()?.list_sorted()?)
    }

    /// Destroys every contact and regenerates the (now empty) mirror.
    pub fn reset(&mut self) -> StoreResult<()> {
        reset_schema(&mut self.conn).map_err(RepoError::from)?;
        info!("event=store_reset module=service status=ok");
        self.regenerate_mirror()
    }

    /// Releases the database handle.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, err)| StoreError::from(err))?;
        info!("event=store_close module=service status=ok");
        Ok(())
    }

    fn repo(&self) -> StoreResult<SqliteContactRepository<'_>> {
        Ok(SqliteContactRepository::try_new(&self.conn)?)
    }

    fn regenerate_mirror(&self) -> StoreResult<()> {
        let contacts = self.repo()?.list_sorted()?;
        write_mirror(&self.mirror_path, &contacts).map_err(StoreError::Mirror)
    }
}

fn ensure_parent_dir(path: &Path, role: &str) -> StoreResult<()> {
    let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };

    if dir.is_dir() {
        info!("event=dir_check module=service status=exists role={role}");
        return Ok(());
    }

    warn!("event=dir_check module=service status=missing role={role} action=create");
    std::fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn error_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::CreateDir { .. } => "create_dir_failed",
        StoreError::Unavailable(_) => "store_unavailable",
        StoreError::Validation(_) => "invalid_input",
        StoreError::DuplicateName(_) => "duplicate_name",
        StoreError::NotFound(_) => "not_found",
        StoreError::Repo(_) => "db_error",
        StoreError::Mirror(_) => "mirror_write_failed",
    }
}
