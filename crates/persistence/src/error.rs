// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bookings::StoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored row could not be turned into a domain value.
    InvalidRow(String),
    /// The requested room was not found.
    RoomNotFound(i64),
    /// The requested reservation was not found.
    ReservationNotFound(i64),
    /// The requested user was not found.
    UserNotFound(String),
    /// A user with this email already exists.
    DuplicateEmail(String),
    /// The requested session was not found.
    SessionNotFound(String),
    /// The write conflicts with stored state.
    Conflict(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::InvalidRow(msg) => write!(f, "Invalid stored row: {msg}"),
            Self::RoomNotFound(room_id) => write!(f, "Room not found: {room_id}"),
            Self::ReservationNotFound(reservation_id) => {
                write!(f, "Reservation not found: {reservation_id}")
            }
            Self::UserNotFound(msg) => write!(f, "User not found: {msg}"),
            Self::DuplicateEmail(email) => write!(f, "User with email '{email}' already exists"),
            Self::SessionNotFound(msg) => write!(f, "Session not found: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<bookings_domain::DomainError> for PersistenceError {
    fn from(err: bookings_domain::DomainError) -> Self {
        Self::InvalidRow(err.to_string())
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Conflict(reason) => Self::Conflict(reason),
            PersistenceError::RoomNotFound(room_id) => Self::NotFound(room_id),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
