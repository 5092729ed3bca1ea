// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and configuring the `SQLite` connection.
//!
//! Everything here is connection-level SQL: `PRAGMA`s, migrations and
//! `last_insert_rowid()`. Schema queries and mutations live in `queries/` and
//! `mutations/`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Journal mode applied when a database is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Journal {
    /// `SQLite`'s rollback journal. In-memory databases use this.
    Rollback,
    /// Write-ahead logging, so readers are not blocked by the writer.
    Wal,
}

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

fn pragma(conn: &mut SqliteConnection, setting: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA {setting}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("PRAGMA {setting}: {e}")))?;
    debug!(setting, "Applied SQLite pragma");
    Ok(())
}

/// Opens `database_url` with foreign keys on and the schema migrated.
///
/// `database_url` is a file path or a `file:` URI such as a shared-cache
/// in-memory database.
///
/// # Errors
///
/// - `PersistenceError::DatabaseConnectionFailed` if the database cannot be
///   opened
/// - `PersistenceError::QueryFailed` if a pragma is rejected
/// - `PersistenceError::MigrationFailed` if a migration fails
/// - `PersistenceError::ForeignKeyEnforcementNotEnabled` if enforcement did
///   not take effect
pub fn open(database_url: &str, journal: Journal) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?journal, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    pragma(&mut conn, "foreign_keys = ON")?;
    if journal == Journal::Wal {
        pragma(&mut conn, "journal_mode = WAL")?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    info!(applied = applied.len(), "Schema is up to date");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Returns the rowid of the last row inserted on `conn`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `conn` enforces foreign keys.
///
/// Reservation restrictions and session values rely on cascading deletes.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if the pragma
/// reports enforcement off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let enforced: bool = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<ForeignKeysPragma>(conn)?
        .foreign_keys
        != 0;

    if !enforced {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    debug!("SQLite foreign key enforcement is on");
    Ok(())
}

/// Sets how long a statement waits on a locked database, in milliseconds.
///
/// # Errors
///
/// Returns an error if the pragma is rejected.
pub fn set_busy_timeout(
    conn: &mut SqliteConnection,
    timeout_ms: u32,
) -> Result<(), PersistenceError> {
    pragma(conn, &format!("busy_timeout = {timeout_ms}"))?;
    info!(timeout_ms, "SQLite busy timeout set");
    Ok(())
}
