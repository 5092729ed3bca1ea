// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{Fault, ScriptedStore, StoreCall};
use crate::{RestrictionStore, StoreError, available_rooms, is_room_available};
use bookings_domain::{Room, StayRange};
use time::Date;
use time::macros::date;

fn stay(start: Date, end: Date) -> StayRange {
    StayRange::new(start, end).unwrap()
}

#[test]
fn test_room_without_restrictions_is_available() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(1);
    let window: StayRange = stay(date!(2025 - 06 - 01), date!(2025 - 06 - 05));

    assert!(is_room_available(&mut store, 1, window).unwrap());
}

#[test]
fn test_insert_flips_availability_and_delete_flips_back() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(1);
    let window: StayRange = stay(date!(2025 - 06 - 01), date!(2025 - 06 - 05));
    assert!(is_room_available(&mut store, 1, window).unwrap());

    let id: i64 = store.insert_block(1, date!(2025 - 06 - 04)).unwrap();
    assert!(!is_room_available(&mut store, 1, window).unwrap());

    let version: i64 = store.restriction(id).unwrap().version;
    store
        .delete_block(&bookings_domain::BlockRef::new(id, version))
        .unwrap();
    assert!(is_room_available(&mut store, 1, window).unwrap());
}

#[test]
fn test_checkout_day_is_bookable() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(1);
    store.add_reservation(1, date!(2025 - 06 - 10), date!(2025 - 06 - 12));

    let next_guest: StayRange = stay(date!(2025 - 06 - 12), date!(2025 - 06 - 14));
    let previous_guest: StayRange = stay(date!(2025 - 06 - 08), date!(2025 - 06 - 10));

    assert!(is_room_available(&mut store, 1, next_guest).unwrap());
    assert!(is_room_available(&mut store, 1, previous_guest).unwrap());
}

#[test]
fn test_restriction_on_other_room_does_not_affect_availability() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(2);
    store.add_block(2, date!(2025 - 06 - 01), date!(2025 - 06 - 30));

    let window: StayRange = stay(date!(2025 - 06 - 10), date!(2025 - 06 - 11));
    assert!(is_room_available(&mut store, 1, window).unwrap());
    assert!(!is_room_available(&mut store, 2, window).unwrap());
}

#[test]
fn test_store_failure_is_not_reported_as_available() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(1);
    let window: StayRange = stay(date!(2025 - 06 - 01), date!(2025 - 06 - 05));
    store.script(
        StoreCall::CountOverlapping { room_id: 1, window },
        Fault::Unavailable,
    );

    let result: Result<bool, StoreError> = is_room_available(&mut store, 1, window);

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

#[test]
fn test_available_rooms_are_sorted_by_id() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(3);
    let window: StayRange = stay(date!(2025 - 06 - 01), date!(2025 - 06 - 05));

    let ids: Vec<i64> = available_rooms(&mut store, window)
        .unwrap()
        .iter()
        .map(|room| room.room_id)
        .collect();

    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_no_free_room_is_empty_not_error() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(2);
    store.add_reservation(1, date!(2025 - 06 - 01), date!(2025 - 06 - 10));
    store.add_block(2, date!(2025 - 06 - 03), date!(2025 - 06 - 04));

    let window: StayRange = stay(date!(2025 - 06 - 02), date!(2025 - 06 - 05));
    let rooms: Vec<Room> = available_rooms(&mut store, window).unwrap();

    assert!(rooms.is_empty());
}

#[test]
fn test_all_rooms_search_matches_single_room_checks() {
    let mut store: ScriptedStore = ScriptedStore::with_rooms(4);
    store.add_reservation(1, date!(2025 - 06 - 10), date!(2025 - 06 - 12));
    store.add_block(2, date!(2025 - 06 - 12), date!(2025 - 06 - 13));
    store.add_reservation(3, date!(2025 - 06 - 05), date!(2025 - 06 - 20));

    let windows: Vec<StayRange> = vec![
        stay(date!(2025 - 06 - 01), date!(2025 - 06 - 10)),
        stay(date!(2025 - 06 - 11), date!(2025 - 06 - 12)),
        stay(date!(2025 - 06 - 12), date!(2025 - 06 - 13)),
        stay(date!(2025 - 06 - 20), date!(2025 - 06 - 25)),
    ];

    for window in windows {
        let free: Vec<i64> = available_rooms(&mut store, window)
            .unwrap()
            .iter()
            .map(|room| room.room_id)
            .collect();
        let expected: Vec<i64> = store
            .room_ids()
            .into_iter()
            .filter(|room_id| is_room_available(&mut store, *room_id, window).unwrap())
            .collect();
        assert_eq!(free, expected, "window {window}");
    }
}
