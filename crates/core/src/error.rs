// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bookings_domain::DomainError;

/// Errors reported by a `RestrictionStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or the operation failed.
    ///
    /// The outcome of the call is unknown to the caller.
    Unavailable(String),
    /// The stored state no longer matches what the caller observed:
    /// a block changed or vanished since it was read, or a day the caller
    /// wants to block is already restricted.
    Conflict(String),
    /// The referenced room does not exist.
    NotFound(i64),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Restriction store unavailable: {msg}"),
            Self::Conflict(reason) => write!(f, "Conflicting restriction: {reason}"),
            Self::NotFound(room_id) => write!(f, "Room {room_id} not found"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors that can occur inside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The restriction store failed.
    Store(StoreError),
    /// A session value could not be encoded or decoded.
    Session {
        /// The session key.
        key: String,
        /// The serialization error message.
        message: String,
    },
    /// A calendar form field could not be decoded.
    InvalidSubmission {
        /// The offending field name.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Session { key, message } => {
                write!(f, "Session value '{key}' is unreadable: {message}")
            }
            Self::InvalidSubmission { field, reason } => {
                write!(f, "Invalid calendar field '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
