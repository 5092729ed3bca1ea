// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Block calendar render and submit.

use bookings::{FlashLevel, RestrictionStore, SessionState, block_map_key};
use bookings_domain::{CalendarMonth, Room, StayRange};
use bookings_persistence::Persistence;
use time::macros::date;

use crate::{
    ApiError, AvailabilityQuery, CalendarQuery, check_room_availability, create_reservation,
    render_calendar, resolve_calendar_month, submit_calendar,
};

use super::helpers::{
    OWNER_EMAIL, RecordingMailer, UnavailableStore, create_booking_request, setup_test_persistence,
};

fn june() -> CalendarMonth {
    CalendarMonth::new(2025, 6).unwrap()
}

fn rooms(persistence: &mut Persistence) -> Vec<Room> {
    persistence.list_rooms().unwrap()
}

fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| (String::from(*name), String::from(*value)))
        .collect()
}

fn room_is_free(persistence: &mut Persistence, room_id: i64, start: &str, end: &str) -> bool {
    let query = AvailabilityQuery {
        start: String::from(start),
        end: String::from(end),
    };
    check_room_availability(persistence, room_id, &query)
        .unwrap()
        .available
}

#[test]
fn test_resolve_month_defaults_to_today() {
    let month = resolve_calendar_month(&CalendarQuery::default(), date!(2025 - 06 - 15)).unwrap();

    assert_eq!(month, june());
}

#[test]
fn test_resolve_month_from_query() {
    let query = CalendarQuery {
        y: Some(2026),
        m: Some(2),
    };

    let month = resolve_calendar_month(&query, date!(2025 - 06 - 15)).unwrap();

    assert_eq!(month, CalendarMonth::new(2026, 2).unwrap());
}

#[test]
fn test_resolve_month_needs_both_parts() {
    let query = CalendarQuery {
        y: Some(2026),
        m: None,
    };

    let result = resolve_calendar_month(&query, date!(2025 - 06 - 15));

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "y"));
}

#[test]
fn test_resolve_month_rejects_month_thirteen() {
    let query = CalendarQuery {
        y: Some(2026),
        m: Some(13),
    };

    let result = resolve_calendar_month(&query, date!(2025 - 06 - 15));

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "month"));
}

#[test]
fn test_render_shows_states_and_stages_snapshots() {
    let mut persistence = setup_test_persistence();
    let reservation = create_reservation(
        &mut persistence,
        &RecordingMailer::default(),
        OWNER_EMAIL,
        &create_booking_request(1, "2025-06-10", "2025-06-12"),
    )
    .unwrap();
    let block_id = persistence.insert_block(2, date!(2025 - 06 - 20)).unwrap();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();

    let response = render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();

    assert_eq!(response.days_in_month, 30);
    assert_eq!((response.previous.year, response.previous.month), (2025, 5));
    assert_eq!((response.next.year, response.next.month), (2025, 7));
    assert_eq!(response.rooms.len(), 2);
    assert_eq!(response.rooms[0].days.len(), 30);

    let reserved = &response.rooms[0].days[9];
    assert_eq!(reserved.date, "2025-06-10");
    assert_eq!(reserved.state, "reserved");
    assert_eq!(reserved.reservation_id, Some(reservation.reservation_id));
    assert_eq!(response.rooms[0].days[11].state, "open");

    let blocked = &response.rooms[1].days[19];
    assert_eq!(blocked.state, "blocked");
    assert_eq!(blocked.restriction_id, Some(block_id));

    assert!(session.contains(&block_map_key(1)));
    assert!(session.contains(&block_map_key(2)));
    assert!(response.flash.is_none());
}

#[test]
fn test_render_failure_leaves_session_alone() {
    let rooms = vec![Room::new(1, "General's Quarters")];
    let mut session = SessionState::new();

    let result = render_calendar(&mut UnavailableStore, &rooms, &mut session, june());

    assert!(matches!(result, Err(ApiError::Internal { .. })));
    assert!(!session.is_modified());
    assert!(session.values().is_empty());
}

#[test]
fn test_submit_adds_block_and_redirects() {
    let mut persistence = setup_test_persistence();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();
    render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();

    let response = submit_calendar(
        &mut persistence,
        &room_list,
        &mut session,
        &form(&[("y", "2025"), ("m", "6"), ("add_block_1_2025-06-10", "1")]),
    )
    .unwrap();

    assert_eq!(response.applied, 1);
    assert_eq!(response.conflicts, 0);
    assert_eq!(response.redirect_to, "/admin/reservations-calendar?y=2025&m=06");
    assert!(!room_is_free(&mut persistence, 1, "2025-06-10", "2025-06-11"));
    assert!(room_is_free(&mut persistence, 1, "2025-06-11", "2025-06-12"));

    let next = render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();
    let flash = next.flash.unwrap();
    assert_eq!(flash.level, FlashLevel::Success);
    assert_eq!(flash.message, "Calendar for 2025-06 saved (1 change(s))");
    assert_eq!(next.rooms[0].days[9].state, "blocked");

    let again = render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();
    assert!(again.flash.is_none());
}

#[test]
fn test_submit_removes_unchecked_block() {
    let mut persistence = setup_test_persistence();
    persistence.insert_block(1, date!(2025 - 06 - 05)).unwrap();
    persistence.insert_block(1, date!(2025 - 06 - 06)).unwrap();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();
    render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();

    let response = submit_calendar(
        &mut persistence,
        &room_list,
        &mut session,
        &form(&[("y", "2025"), ("m", "6"), ("keep_block_1_2025-06-06", "1")]),
    )
    .unwrap();

    assert_eq!(response.applied, 1);
    assert!(room_is_free(&mut persistence, 1, "2025-06-05", "2025-06-06"));
    assert!(!room_is_free(&mut persistence, 1, "2025-06-06", "2025-06-07"));
}

#[test]
fn test_submit_clearing_block_from_previous_month_keeps_its_may_days() {
    let mut persistence = setup_test_persistence();
    persistence
        .insert_block_range(1, StayRange::parse("2025-05-29", "2025-06-03").unwrap())
        .unwrap();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();
    render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();

    let response = submit_calendar(
        &mut persistence,
        &room_list,
        &mut session,
        &form(&[("y", "2025"), ("m", "6"), ("keep_block_1_2025-06-01", "1")]),
    )
    .unwrap();

    assert_eq!(response.applied, 3);
    assert_eq!(response.conflicts, 0);
    assert!(!room_is_free(&mut persistence, 1, "2025-05-29", "2025-05-30"));
    assert!(!room_is_free(&mut persistence, 1, "2025-05-31", "2025-06-01"));
    assert!(!room_is_free(&mut persistence, 1, "2025-06-01", "2025-06-02"));
    assert!(room_is_free(&mut persistence, 1, "2025-06-02", "2025-06-03"));
}

#[test]
fn test_submit_without_render_never_deletes() {
    let mut persistence = setup_test_persistence();
    persistence.insert_block(1, date!(2025 - 06 - 05)).unwrap();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();

    let response = submit_calendar(
        &mut persistence,
        &room_list,
        &mut session,
        &form(&[("y", "2025"), ("m", "6")]),
    )
    .unwrap();

    assert_eq!(response.applied, 0);
    assert!(!room_is_free(&mut persistence, 1, "2025-06-05", "2025-06-06"));
}

#[test]
fn test_submit_reports_conflict_in_flash() {
    let mut persistence = setup_test_persistence();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();
    render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();

    // a guest books the day between render and submit
    create_reservation(
        &mut persistence,
        &RecordingMailer::default(),
        OWNER_EMAIL,
        &create_booking_request(1, "2025-06-10", "2025-06-11"),
    )
    .unwrap();

    let response = submit_calendar(
        &mut persistence,
        &room_list,
        &mut session,
        &form(&[
            ("y", "2025"),
            ("m", "6"),
            ("add_block_1_2025-06-10", "1"),
            ("add_block_2_2025-06-10", "1"),
        ]),
    )
    .unwrap();

    assert_eq!(response.applied, 1);
    assert_eq!(response.conflicts, 1);

    let next = render_calendar(&mut persistence, &room_list, &mut session, june()).unwrap();
    let flash = next.flash.unwrap();
    assert_eq!(flash.level, FlashLevel::Warning);
    assert!(flash.message.contains("partly saved"));
}

#[test]
fn test_submit_requires_month_fields() {
    let mut persistence = setup_test_persistence();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();

    let result = submit_calendar(
        &mut persistence,
        &room_list,
        &mut session,
        &form(&[("m", "6"), ("add_block_1_2025-06-10", "1")]),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "y"));
    assert!(room_is_free(&mut persistence, 1, "2025-06-10", "2025-06-11"));
}

#[test]
fn test_malformed_field_rejects_whole_submission() {
    let mut persistence = setup_test_persistence();
    let room_list = rooms(&mut persistence);
    let mut session = SessionState::new();

    let result = submit_calendar(
        &mut persistence,
        &room_list,
        &mut session,
        &form(&[
            ("y", "2025"),
            ("m", "6"),
            ("add_block_1_2025-06-10", "1"),
            ("add_block_x_2025-06-11", "1"),
        ]),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    assert!(room_is_free(&mut persistence, 1, "2025-06-10", "2025-06-12"));
    assert!(session.take_flash().is_none());
}
