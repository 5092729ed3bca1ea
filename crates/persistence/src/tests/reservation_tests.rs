// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation lifecycle tests.

use bookings::RestrictionStore;
use bookings_domain::{GuestDetails, Reservation, RestrictionType};

use super::{create_test_guest, create_test_persistence, reserve, stay};
use crate::PersistenceError;

#[test]
fn test_create_reservation_stores_reservation_and_restriction() {
    let mut persistence = create_test_persistence();

    let reservation_id = reserve(&mut persistence, 1, "2025-06-10", "2025-06-15");

    let data = persistence
        .get_reservation(reservation_id)
        .unwrap()
        .unwrap();
    assert_eq!(data.reservation.reservation_id, Some(reservation_id));
    assert_eq!(data.reservation.room_id, 1);
    assert_eq!(data.reservation.stay, stay("2025-06-10", "2025-06-15"));
    assert_eq!(data.reservation.guest, create_test_guest());
    assert!(!data.reservation.processed);
    assert_eq!(data.room_name, "General's Quarters");

    let restrictions = persistence
        .find_overlapping(1, stay("2025-06-01", "2025-07-01"))
        .unwrap();
    assert_eq!(restrictions.len(), 1);
    assert_eq!(restrictions[0].restriction_type, RestrictionType::Reservation);
    assert_eq!(restrictions[0].reservation_id, Some(reservation_id));
}

#[test]
fn test_create_reservation_rejects_overlap() {
    let mut persistence = create_test_persistence();
    reserve(&mut persistence, 1, "2025-06-10", "2025-06-15");

    let second = Reservation::new(1, stay("2025-06-14", "2025-06-16"), create_test_guest());
    let result = persistence.create_reservation(&second);

    assert!(matches!(result, Err(PersistenceError::Conflict(_))));
    assert_eq!(persistence.list_reservations(false).unwrap().len(), 1);
}

#[test]
fn test_create_reservation_back_to_back_succeeds() {
    let mut persistence = create_test_persistence();
    reserve(&mut persistence, 1, "2025-06-10", "2025-06-15");

    let next = Reservation::new(1, stay("2025-06-15", "2025-06-17"), create_test_guest());

    assert!(persistence.create_reservation(&next).is_ok());
}

#[test]
fn test_create_reservation_for_unknown_room_fails() {
    let mut persistence = create_test_persistence();

    let reservation = Reservation::new(9, stay("2025-06-10", "2025-06-15"), create_test_guest());
    let result = persistence.create_reservation(&reservation);

    assert_eq!(result, Err(PersistenceError::RoomNotFound(9)));
}

#[test]
fn test_list_reservations_filters_processed() {
    let mut persistence = create_test_persistence();
    let first = reserve(&mut persistence, 1, "2025-06-10", "2025-06-15");
    let second = reserve(&mut persistence, 2, "2025-07-01", "2025-07-03");
    persistence.mark_reservation_processed(first).unwrap();

    let all = persistence.list_reservations(false).unwrap();
    let new = persistence.list_reservations(true).unwrap();

    assert_eq!(all.len(), 2);
    // Newest stay first
    assert_eq!(all[0].reservation.reservation_id, Some(second));
    assert_eq!(new.len(), 1);
    assert_eq!(new[0].reservation.reservation_id, Some(second));
}

#[test]
fn test_update_guest_details() {
    let mut persistence = create_test_persistence();
    let reservation_id = reserve(&mut persistence, 1, "2025-06-10", "2025-06-15");

    let guest = GuestDetails::new("Robert", "Hayes", "rob@example.com", "");
    persistence
        .update_guest_details(reservation_id, &guest)
        .unwrap();

    let data = persistence
        .get_reservation(reservation_id)
        .unwrap()
        .unwrap();
    assert_eq!(data.reservation.guest, guest);
}

#[test]
fn test_update_unknown_reservation_fails() {
    let mut persistence = create_test_persistence();

    let result = persistence.update_guest_details(77, &create_test_guest());

    assert_eq!(result, Err(PersistenceError::ReservationNotFound(77)));
}

#[test]
fn test_mark_processed_is_idempotent() {
    let mut persistence = create_test_persistence();
    let reservation_id = reserve(&mut persistence, 1, "2025-06-10", "2025-06-15");

    persistence
        .mark_reservation_processed(reservation_id)
        .unwrap();
    persistence
        .mark_reservation_processed(reservation_id)
        .unwrap();

    let data = persistence
        .get_reservation(reservation_id)
        .unwrap()
        .unwrap();
    assert!(data.reservation.processed);
}

#[test]
fn test_delete_reservation_frees_room() {
    let mut persistence = create_test_persistence();
    let reservation_id = reserve(&mut persistence, 1, "2025-06-10", "2025-06-15");

    persistence.delete_reservation(reservation_id).unwrap();

    assert!(
        persistence
            .get_reservation(reservation_id)
            .unwrap()
            .is_none()
    );
    assert_eq!(
        persistence
            .count_overlapping(1, stay("2025-06-10", "2025-06-15"))
            .unwrap(),
        0
    );
}

#[test]
fn test_delete_unknown_reservation_fails() {
    let mut persistence = create_test_persistence();

    let result = persistence.delete_reservation(5);

    assert_eq!(result, Err(PersistenceError::ReservationNotFound(5)));
}
