//! SQLite schema registry and executor.
//!
//! # Responsibility
//! - Register schema steps in strictly increasing order.
//! - Apply pending steps atomically.
//! - Rebuild the contacts schema from scratch on reset.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied schema version is mirrored to `PRAGMA user_version`.
//! - Every step is create-if-absent; applying never drops existing rows.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, Transaction};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_contacts.sql"),
}];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending schema steps on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    apply_from(&tx, current_version)?;
    tx.commit()?;

    info!(
        "event=schema_apply module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

/// Drops the `contacts` table and replays every schema step from version 0.
///
/// All rows are destroyed. The drop and the rebuild share one transaction, so
/// a failure leaves the previous table intact.
pub fn reset_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DROP TABLE IF EXISTS contacts;")?;
    apply_from(&tx, 0)?;
    tx.commit()?;

    info!(
        "event=schema_reset module=db status=ok version={}",
        latest_version()
    );
    Ok(())
}

fn apply_from(tx: &Transaction<'_>, current_version: u32) -> DbResult<()> {
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::SchemaStep {
                version: migration.version,
                source,
            })?;
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
