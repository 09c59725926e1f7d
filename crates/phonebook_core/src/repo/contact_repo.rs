//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/delete/list APIs over the `contacts` table.
//! - Keep SQL details inside the core persistence boundary.
//! - Translate the UNIQUE constraint into a semantic duplicate-name error.
//!
//! # Invariants
//! - Write paths call `validate_contact_input` before SQL mutations.
//! - Listing order is `(sort key ASC, name ASC)`, matching [`sort_key`].
//!
//! [`sort_key`]: crate::model::contact::sort_key

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::contact::{validate_contact_input, Contact, ContactId, ContactValidationError};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACTS_TABLE: &str = "contacts";
const CONTACTS_COLUMNS: &[&str] = &["id", "name", "phone"];

// Keep in sync with `model::contact::sort_key`.
const CONTACT_LIST_SQL: &str = "SELECT id, name, phone
FROM contacts
ORDER BY
    CASE
        WHEN instr(name, ' ') > 0 THEN substr(name, instr(name, ' ') + 1)
        ELSE ''
    END ASC,
    name ASC;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    /// A contact with this exact name already exists.
    DuplicateName(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => write!(f, "contact name already exists: {name}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicateName(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact operations.
pub trait ContactRepository {
    /// Inserts a new contact and returns it with its assigned id.
    fn insert_contact(&self, name: &str, phone: &str) -> RepoResult<Contact>;
    /// Deletes the contact whose name matches exactly. Returns rows removed.
    fn delete_by_name(&self, name: &str) -> RepoResult<usize>;
    /// Lists all contacts in display order.
    fn list_sorted(&self) -> RepoResult<Vec<Contact>>;
    /// Returns the number of stored contacts.
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a connection with the schema applied.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this binary writes.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_contact_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn insert_contact(&self, name: &str, phone: &str) -> RepoResult<Contact> {
        validate_contact_input(name, phone)?;

        let inserted = self.conn.execute(
            "INSERT INTO contacts (name, phone) VALUES (?1, ?2);",
            params![name, phone],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::DuplicateName(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        }

        Ok(Contact {
            id: ContactId(self.conn.last_insert_rowid()),
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }

    fn delete_by_name(&self, name: &str) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM contacts WHERE name = ?1;", [name])?;
        Ok(removed)
    }

    fn list_sorted(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(CONTACT_LIST_SQL)?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    Ok(Contact {
        id: ContactId(row.get("id")?),
        name: row.get("name")?,
        phone: row.get("phone")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_contact_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [CONTACTS_TABLE],
        |row| row.get(0),
    )?;
    if table_exists != 1 {
        return Err(RepoError::MissingRequiredTable(CONTACTS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([CONTACTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in CONTACTS_COLUMNS {
        if !present.iter().any(|name| name.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: CONTACTS_TABLE,
                column,
            });
        }
    }

    Ok(())
}
