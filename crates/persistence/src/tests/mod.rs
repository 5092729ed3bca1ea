// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod reservation_tests;

use bookings_domain::{GuestDetails, Reservation, StayRange, parse_iso_date};
use time::Date;

use crate::Persistence;

pub fn date(value: &str) -> Date {
    parse_iso_date(value).unwrap()
}

pub fn stay(start: &str, end: &str) -> StayRange {
    StayRange::parse(start, end).unwrap()
}

pub fn create_test_guest() -> GuestDetails {
    GuestDetails::new("Alice", "Walker", "alice@example.com", "555-0100")
}

/// Creates a persistence instance with two rooms, ids 1 and 2.
pub fn create_test_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence.create_room("General's Quarters").unwrap();
    persistence.create_room("Major's Suite").unwrap();
    persistence
}

pub fn reserve(persistence: &mut Persistence, room_id: i64, start: &str, end: &str) -> i64 {
    let reservation = Reservation::new(room_id, stay(start, end), create_test_guest());
    persistence.create_reservation(&reservation).unwrap()
}
