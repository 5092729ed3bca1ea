// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::stay::StayRange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// The canonical numeric identifier assigned by the database.
    pub room_id: i64,
    /// The display name.
    pub room_name: String,
}

impl Room {
    /// Creates a new `Room`.
    #[must_use]
    pub fn new(room_id: i64, room_name: &str) -> Self {
        Self {
            room_id,
            room_name: room_name.to_string(),
        }
    }
}

/// Why a room is unavailable for an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestrictionType {
    /// A guest reservation. Owned by exactly one `Reservation`.
    Reservation,
    /// A manual block placed by staff from the admin calendar.
    OwnerBlock,
}

impl RestrictionType {
    /// Converts this restriction type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reservation => "Reservation",
            Self::OwnerBlock => "OwnerBlock",
        }
    }
}

impl FromStr for RestrictionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Reservation" => Ok(Self::Reservation),
            "OwnerBlock" => Ok(Self::OwnerBlock),
            _ => Err(DomainError::InvalidRestrictionType(s.to_string())),
        }
    }
}

impl std::fmt::Display for RestrictionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The unit of unavailability: a room is restricted over a half-open interval.
///
/// Restrictions are never updated in place. A change is a delete followed by
/// an insert, which is what makes `version` meaningful: a row whose version
/// differs from the one a caller observed has been replaced underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRestriction {
    /// The canonical numeric identifier assigned by the database.
    pub restriction_id: i64,
    /// The restricted room.
    pub room_id: i64,
    /// The restricted interval.
    pub stay: StayRange,
    /// Why the room is restricted.
    pub restriction_type: RestrictionType,
    /// The owning reservation. Present iff `restriction_type` is `Reservation`.
    pub reservation_id: Option<i64>,
    /// Row version, starting at 1.
    pub version: i64,
}

impl RoomRestriction {
    /// Creates a new `RoomRestriction`.
    ///
    /// # Arguments
    ///
    /// * `restriction_id` - The database identifier
    /// * `room_id` - The restricted room
    /// * `stay` - The restricted interval
    /// * `restriction_type` - Reservation or owner block
    /// * `reservation_id` - The owning reservation, if any
    /// * `version` - The row version
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRestrictionReference` if a reservation
    /// restriction has no reservation id, or an owner block has one.
    pub fn new(
        restriction_id: i64,
        room_id: i64,
        stay: StayRange,
        restriction_type: RestrictionType,
        reservation_id: Option<i64>,
        version: i64,
    ) -> Result<Self, DomainError> {
        let consistent: bool = match restriction_type {
            RestrictionType::Reservation => reservation_id.is_some(),
            RestrictionType::OwnerBlock => reservation_id.is_none(),
        };
        if !consistent {
            return Err(DomainError::InvalidRestrictionReference {
                restriction_type: restriction_type.to_string(),
                reservation_id,
            });
        }

        Ok(Self {
            restriction_id,
            room_id,
            stay,
            restriction_type,
            reservation_id,
            version,
        })
    }

    /// Returns whether this restriction is an owner block.
    #[must_use]
    pub fn is_owner_block(&self) -> bool {
        self.restriction_type == RestrictionType::OwnerBlock
    }
}

/// Guest identity and contact information attached to a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number. May be empty.
    pub phone: String,
}

impl GuestDetails {
    /// Creates a new `GuestDetails`, trimming surrounding whitespace.
    #[must_use]
    pub fn new(first_name: &str, last_name: &str, email: &str, phone: &str) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
        }
    }

    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A guest booking of one room for one stay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the reservation has not been persisted yet.
    pub reservation_id: Option<i64>,
    /// The booked room.
    pub room_id: i64,
    /// The booked interval.
    pub stay: StayRange,
    /// Who booked it.
    pub guest: GuestDetails,
    /// Whether staff have processed the booking.
    pub processed: bool,
}

impl Reservation {
    /// Creates a new, unprocessed, unpersisted `Reservation`.
    #[must_use]
    pub const fn new(room_id: i64, stay: StayRange, guest: GuestDetails) -> Self {
        Self {
            reservation_id: None,
            room_id,
            stay,
            guest,
            processed: false,
        }
    }

    /// Creates a `Reservation` loaded from the database.
    #[must_use]
    pub const fn with_id(
        reservation_id: i64,
        room_id: i64,
        stay: StayRange,
        guest: GuestDetails,
        processed: bool,
    ) -> Self {
        Self {
            reservation_id: Some(reservation_id),
            room_id,
            stay,
            guest,
            processed,
        }
    }
}
