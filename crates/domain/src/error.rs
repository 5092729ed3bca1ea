// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A stay or restriction interval does not satisfy `start < end`.
    InvalidDateRange {
        /// The first day of the interval.
        start: Date,
        /// The exclusive end of the interval.
        end: Date,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflowed the supported calendar.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A calendar month could not be constructed.
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month number (1-12 expected).
        month: u8,
    },
    /// The restriction type string is not recognized.
    InvalidRestrictionType(String),
    /// The block intent string is not recognized.
    InvalidBlockIntent(String),
    /// The room name is empty or invalid.
    InvalidRoomName(String),
    /// A guest name is empty or too short.
    InvalidGuestName(String),
    /// The email address is malformed.
    InvalidEmail(String),
    /// The phone number is malformed.
    InvalidPhone(String),
    /// A reservation-type restriction is missing its reservation reference,
    /// or an owner block carries one.
    InvalidRestrictionReference {
        /// The restriction type.
        restriction_type: String,
        /// The offending reservation reference.
        reservation_id: Option<i64>,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateRange { start, end } => {
                write!(
                    f,
                    "Invalid date range: start {start} must be before end {end}"
                )
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow: {operation}")
            }
            Self::InvalidMonth { year, month } => {
                write!(f, "Invalid calendar month: {year}-{month:02}")
            }
            Self::InvalidRestrictionType(value) => {
                write!(f, "Invalid restriction type: {value}")
            }
            Self::InvalidBlockIntent(value) => write!(f, "Invalid block intent: {value}"),
            Self::InvalidRoomName(msg) => write!(f, "Invalid room name: {msg}"),
            Self::InvalidGuestName(msg) => write!(f, "Invalid guest name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidPhone(msg) => write!(f, "Invalid phone: {msg}"),
            Self::InvalidRestrictionReference {
                restriction_type,
                reservation_id,
            } => {
                write!(
                    f,
                    "Restriction of type {restriction_type} has invalid reservation reference {reservation_id:?}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
