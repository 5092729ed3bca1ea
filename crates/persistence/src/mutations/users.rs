// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staff user and session mutations.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Nullable, Text};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{session_values, sessions, users};
use crate::error::PersistenceError;

/// Creates a new staff user.
///
/// The email is normalized to lowercase for case-insensitive uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The login email (will be normalized)
/// * `first_name` - The first name
/// * `last_name` - The last name
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role (`Admin` or `Staff`)
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the email is taken, or an
/// error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();

    info!(email = %normalized_email, role, "Creating user");

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let result = diesel::insert_into(users::table)
        .values((
            users::email.eq(&normalized_email),
            users::first_name.eq(first_name),
            users::last_name.eq(last_name),
            users::password_hash.eq(&password_hash),
            users::role.eq(role),
        ))
        .execute(conn);

    match result {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::DuplicateEmail(normalized_email));
        }
        Err(e) => return Err(e.into()),
    }

    let user_id: i64 = conn.inserted_row_id()?;

    info!(user_id, "User created");
    Ok(user_id)
}

/// Updates the last login timestamp for a user.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for user ID: {}", user_id);

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(sql::<Nullable<Text>>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Creates a new session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The user ID
/// * `expires_at` - The expiration timestamp (`YYYY-MM-DD HH:MM:SS`, UTC)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(user_id, expires_at, "Creating session");

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.inserted_row_id()?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(sql::<Text>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token. Its stored values go with it.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes all expired sessions.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(sql::<Text>("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}

/// Replaces every stored value of a session with `values`.
///
/// # Errors
///
/// Returns an error if the transaction fails.
pub fn save_session_values(
    conn: &mut SqliteConnection,
    session_id: i64,
    values: &BTreeMap<String, String>,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        diesel::delete(session_values::table)
            .filter(session_values::session_id.eq(session_id))
            .execute(conn)?;

        for (key, value) in values {
            diesel::insert_into(session_values::table)
                .values((
                    session_values::session_id.eq(session_id),
                    session_values::value_key.eq(key),
                    session_values::value_json.eq(value),
                ))
                .execute(conn)?;
        }

        debug!(session_id, values = values.len(), "Saved session values");
        Ok(())
    })
}
