// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Bookings reservation system.
//!
//! This crate stores rooms, reservations, room restrictions, staff users and
//! login sessions in `SQLite` through Diesel, and implements the engine's
//! `RestrictionStore` contract on top of them.
//!
//! ## Storage
//!
//! - Dates are stored as `YYYY-MM-DD` text. Lexical order equals date order,
//!   so overlap filters run directly in SQL.
//! - Restriction rows are inserted and deleted, never updated. Owner block
//!   deletes match id, type and `version`, and ids are never reused, so a
//!   block removed or re-created since a calendar was rendered is never
//!   deleted by a stale form.
//! - Check-then-insert writes run inside `BEGIN IMMEDIATE` transactions.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory databases
//! - Each call to `new_in_memory()` gets its own database

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use bookings_domain::{GuestDetails, Reservation, Room, RoomRestriction, StayRange};
use diesel::SqliteConnection;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::{ReservationData, SessionData, UserData};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Shared-cache name per call keeps tests isolated.
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_bookings_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open(&shared_memory_url, backend::sqlite::Journal::Rollback)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter over the `SQLite` file at `path`,
    /// creating it if needed. The file is opened in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection =
            backend::sqlite::open(path_str, backend::sqlite::Journal::Wal)?;

        Ok(Self { conn })
    }

    /// Sets how long writes wait on a locked database before failing.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be applied.
    pub fn set_busy_timeout(&mut self, timeout_ms: u32) -> Result<(), PersistenceError> {
        backend::sqlite::set_busy_timeout(&mut self.conn, timeout_ms)
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    /// Creates a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_room(&mut self, room_name: &str) -> Result<Room, PersistenceError> {
        mutations::rooms::create_room(&mut self.conn, room_name)
    }

    /// Lists all rooms ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rooms(&mut self) -> Result<Vec<Room>, PersistenceError> {
        queries::rooms::list_rooms(&mut self.conn)
    }

    /// Retrieves a room by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_room(&mut self, room_id: i64) -> Result<Option<Room>, PersistenceError> {
        queries::rooms::get_room(&mut self.conn, room_id)
    }

    // ========================================================================
    // Restrictions
    // ========================================================================

    /// Retrieves a restriction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row is malformed.
    pub fn get_restriction(
        &mut self,
        restriction_id: i64,
    ) -> Result<Option<RoomRestriction>, PersistenceError> {
        queries::restrictions::get_restriction(&mut self.conn, restriction_id)
    }

    /// Retrieves every restriction of a room overlapping `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn restrictions_overlapping(
        &mut self,
        room_id: i64,
        window: StayRange,
    ) -> Result<Vec<RoomRestriction>, PersistenceError> {
        queries::restrictions::find_overlapping(&mut self.conn, room_id, window)
    }

    // ========================================================================
    // Reservations
    // ========================================================================

    /// Creates a reservation together with the restriction holding its room.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the room is taken for the stay,
    /// `PersistenceError::RoomNotFound` if the room does not exist, or a
    /// database error.
    pub fn create_reservation(
        &mut self,
        reservation: &Reservation,
    ) -> Result<i64, PersistenceError> {
        mutations::reservations::create_reservation(&mut self.conn, reservation)
    }

    /// Lists reservations, optionally only the unprocessed ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        &mut self,
        unprocessed_only: bool,
    ) -> Result<Vec<ReservationData>, PersistenceError> {
        queries::reservations::list_reservations(&mut self.conn, unprocessed_only)
    }

    /// Retrieves a reservation by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<Option<ReservationData>, PersistenceError> {
        queries::reservations::get_reservation(&mut self.conn, reservation_id)
    }

    /// Replaces the guest details of a reservation.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReservationNotFound` or a database error.
    pub fn update_guest_details(
        &mut self,
        reservation_id: i64,
        guest: &GuestDetails,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::update_guest_details(&mut self.conn, reservation_id, guest)
    }

    /// Marks a reservation as processed.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReservationNotFound` or a database error.
    pub fn mark_reservation_processed(
        &mut self,
        reservation_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::mark_processed(&mut self.conn, reservation_id)
    }

    /// Deletes a reservation and frees its room.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReservationNotFound` or a database error.
    pub fn delete_reservation(&mut self, reservation_id: i64) -> Result<(), PersistenceError> {
        mutations::reservations::delete_reservation(&mut self.conn, reservation_id)
    }

    // ========================================================================
    // Users & Sessions
    // ========================================================================

    /// Creates a staff user.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` or a database error.
    pub fn create_user(
        &mut self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, email, first_name, last_name, password, role)
    }

    /// Retrieves a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Counts all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    /// Updates the last login timestamp for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_last_login(&mut self.conn, user_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if password verification fails.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(&mut self.conn)
    }

    /// Loads the stored values of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_session_values(
        &mut self,
        session_id: i64,
    ) -> Result<BTreeMap<String, String>, PersistenceError> {
        queries::users::load_session_values(&mut self.conn, session_id)
    }

    /// Replaces the stored values of a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn save_session_values(
        &mut self,
        session_id: i64,
        values: &BTreeMap<String, String>,
    ) -> Result<(), PersistenceError> {
        mutations::users::save_session_values(&mut self.conn, session_id, values)
    }
}
