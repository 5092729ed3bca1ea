// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod block;
mod calendar;
mod error;
mod stay;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use block::{BlockRef, BlockSnapshot};
pub use calendar::{BlockIntent, CalendarCell, CalendarMonth, DayState};
pub use error::DomainError;
pub use stay::{StayRange, format_iso_date, next_day, parse_iso_date};
pub use types::{GuestDetails, Reservation, RestrictionType, Room, RoomRestriction};
pub use validation::{
    MAX_ROOM_NAME_LENGTH, MIN_FIRST_NAME_LENGTH, validate_email, validate_guest_details,
    validate_phone, validate_room_name,
};
