// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room restriction queries.
//!
//! Dates are stored as `YYYY-MM-DD` text, so string comparison is date
//! comparison. A restriction `r` overlaps a window `w` iff
//! `r.start_date < w.end AND r.end_date > w.start`.

use bookings_domain::{Room, RoomRestriction, StayRange, format_iso_date, parse_iso_date};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::{room_restrictions, rooms};
use crate::error::PersistenceError;
use crate::queries::rooms::RoomRow;

/// Diesel Queryable struct for restriction rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = room_restrictions)]
struct RestrictionRow {
    restriction_id: i64,
    room_id: i64,
    start_date: String,
    end_date: String,
    restriction_type: String,
    reservation_id: Option<i64>,
    version: i64,
}

impl TryFrom<RestrictionRow> for RoomRestriction {
    type Error = PersistenceError;

    fn try_from(row: RestrictionRow) -> Result<Self, Self::Error> {
        let stay: StayRange = StayRange::new(
            parse_iso_date(&row.start_date)?,
            parse_iso_date(&row.end_date)?,
        )?;
        Ok(Self::new(
            row.restriction_id,
            row.room_id,
            stay,
            row.restriction_type.parse()?,
            row.reservation_id,
            row.version,
        )?)
    }
}

/// Retrieves every restriction of a room overlapping `window`, ordered by
/// start date.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn find_overlapping(
    conn: &mut SqliteConnection,
    room_id: i64,
    window: StayRange,
) -> Result<Vec<RoomRestriction>, PersistenceError> {
    let start: String = format_iso_date(window.start());
    let end: String = format_iso_date(window.end());
    debug!(room_id, %window, "Finding overlapping restrictions");

    let rows: Vec<RestrictionRow> = room_restrictions::table
        .filter(room_restrictions::room_id.eq(room_id))
        .filter(room_restrictions::start_date.lt(&end))
        .filter(room_restrictions::end_date.gt(&start))
        .select(RestrictionRow::as_select())
        .order_by((
            room_restrictions::start_date.asc(),
            room_restrictions::restriction_id.asc(),
        ))
        .load(conn)?;

    rows.into_iter().map(RoomRestriction::try_from).collect()
}

/// Counts the restrictions of a room overlapping `window`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_overlapping(
    conn: &mut SqliteConnection,
    room_id: i64,
    window: StayRange,
) -> Result<usize, PersistenceError> {
    use diesel::dsl::count;

    let start: String = format_iso_date(window.start());
    let end: String = format_iso_date(window.end());

    let count: i64 = room_restrictions::table
        .filter(room_restrictions::room_id.eq(room_id))
        .filter(room_restrictions::start_date.lt(&end))
        .filter(room_restrictions::end_date.gt(&start))
        .select(count(room_restrictions::restriction_id))
        .first(conn)?;

    debug!(room_id, %window, count, "Counted overlapping restrictions");
    usize::try_from(count).map_err(|e| PersistenceError::QueryFailed(e.to_string()))
}

/// Retrieves every room with no restriction overlapping `window`, ordered by
/// room ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_available_rooms(
    conn: &mut SqliteConnection,
    window: StayRange,
) -> Result<Vec<Room>, PersistenceError> {
    let start: String = format_iso_date(window.start());
    let end: String = format_iso_date(window.end());
    debug!(%window, "Finding available rooms");

    let restricted = room_restrictions::table
        .filter(room_restrictions::start_date.lt(&end))
        .filter(room_restrictions::end_date.gt(&start))
        .select(room_restrictions::room_id);

    let rows: Vec<RoomRow> = rooms::table
        .filter(rooms::room_id.ne_all(restricted))
        .select(RoomRow::as_select())
        .order_by(rooms::room_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Room::from).collect())
}

/// Retrieves a restriction by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
/// Returns `Ok(None)` if the restriction is not found.
pub fn get_restriction(
    conn: &mut SqliteConnection,
    restriction_id: i64,
) -> Result<Option<RoomRestriction>, PersistenceError> {
    let row: Option<RestrictionRow> = room_restrictions::table
        .filter(room_restrictions::restriction_id.eq(restriction_id))
        .select(RestrictionRow::as_select())
        .first(conn)
        .optional()?;

    row.map(RoomRestriction::try_from).transpose()
}
