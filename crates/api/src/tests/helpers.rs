// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Mutex;

use bookings::{RestrictionStore, StoreError};
use bookings_domain::{BlockRef, Room, RoomRestriction, StayRange};
use bookings_persistence::Persistence;
use time::Date;

use crate::{AuthenticatedActor, CreateReservationRequest, MailError, MailMessage, Mailer, Role};

pub const OWNER_EMAIL: &str = "owner@bookings.test";

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(1, String::from("admin@bookings.test"), Role::Admin)
}

pub fn create_test_staff() -> AuthenticatedActor {
    AuthenticatedActor::new(2, String::from("staff@bookings.test"), Role::Staff)
}

/// Creates an in-memory database with two rooms, ids 1 and 2.
pub fn setup_test_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory().expect("Failed to create persistence");
    persistence.create_room("General's Quarters").unwrap();
    persistence.create_room("Major's Suite").unwrap();
    persistence
}

pub fn create_booking_request(room_id: i64, start: &str, end: &str) -> CreateReservationRequest {
    CreateReservationRequest {
        room_id,
        start_date: String::from(start),
        end_date: String::from(end),
        first_name: String::from("Alice"),
        last_name: String::from("Walker"),
        email: String::from("alice@example.com"),
        phone: String::from("555-010-0199"),
    }
}

/// Mailer that keeps every message it is given.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    pub fn messages(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Mailer whose every delivery fails.
pub struct RefusingMailer;

impl Mailer for RefusingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        Err(MailError::Delivery {
            to: message.to.clone(),
            reason: String::from("relay refused"),
        })
    }
}

/// Restriction store that is always down.
pub struct UnavailableStore;

impl UnavailableStore {
    fn down<T>() -> Result<T, StoreError> {
        Err(StoreError::Unavailable(String::from("database is locked")))
    }
}

impl RestrictionStore for UnavailableStore {
    fn find_overlapping(
        &mut self,
        _room_id: i64,
        _window: StayRange,
    ) -> Result<Vec<RoomRestriction>, StoreError> {
        Self::down()
    }

    fn count_overlapping(
        &mut self,
        _room_id: i64,
        _window: StayRange,
    ) -> Result<usize, StoreError> {
        Self::down()
    }

    fn find_available_rooms(&mut self, _window: StayRange) -> Result<Vec<Room>, StoreError> {
        Self::down()
    }

    fn insert_block(&mut self, _room_id: i64, _date: Date) -> Result<i64, StoreError> {
        Self::down()
    }

    fn insert_block_range(&mut self, _room_id: i64, _stay: StayRange) -> Result<i64, StoreError> {
        Self::down()
    }

    fn delete_block(&mut self, _block: &BlockRef) -> Result<(), StoreError> {
        Self::down()
    }
}
