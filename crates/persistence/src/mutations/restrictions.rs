// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Owner block mutations.
//!
//! Each mutation is a single atomic unit: inserts re-check overlap inside an
//! immediate transaction, and the delete matches id, type and version in one
//! statement. Rows are never updated in place.

use bookings_domain::{BlockRef, RestrictionType, StayRange, format_iso_date};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::room_restrictions;
use crate::error::PersistenceError;
use crate::queries::restrictions::count_overlapping;
use crate::queries::rooms::room_exists;

/// Inserts a restriction row for `stay`.
///
/// Callers run this inside their own transaction after checking overlap.
pub(crate) fn insert_restriction(
    conn: &mut SqliteConnection,
    room_id: i64,
    stay: StayRange,
    restriction_type: RestrictionType,
    reservation_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(room_restrictions::table)
        .values((
            room_restrictions::room_id.eq(room_id),
            room_restrictions::start_date.eq(format_iso_date(stay.start())),
            room_restrictions::end_date.eq(format_iso_date(stay.end())),
            room_restrictions::restriction_type.eq(restriction_type.as_str()),
            room_restrictions::reservation_id.eq(reservation_id),
        ))
        .execute(conn)?;

    conn.inserted_row_id()
}

/// Creates a single-day owner block `[date, date + 1)`.
///
/// # Errors
///
/// - `PersistenceError::RoomNotFound` if the room does not exist
/// - `PersistenceError::Conflict` if any restriction already covers the day
/// - Any database error
pub fn insert_block(
    conn: &mut SqliteConnection,
    room_id: i64,
    date: Date,
) -> Result<i64, PersistenceError> {
    insert_block_range(conn, room_id, StayRange::single_day(date)?)
}

/// Creates an owner block covering `stay`.
///
/// # Errors
///
/// - `PersistenceError::RoomNotFound` if the room does not exist
/// - `PersistenceError::Conflict` if any restriction overlaps `stay`
/// - Any database error
pub fn insert_block_range(
    conn: &mut SqliteConnection,
    room_id: i64,
    stay: StayRange,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        if !room_exists(conn, room_id)? {
            return Err(PersistenceError::RoomNotFound(room_id));
        }
        if count_overlapping(conn, room_id, stay)? > 0 {
            return Err(PersistenceError::Conflict(format!(
                "room {room_id} is already restricted during {stay}"
            )));
        }

        let restriction_id: i64 =
            insert_restriction(conn, room_id, stay, RestrictionType::OwnerBlock, None)?;
        info!(restriction_id, room_id, %stay, "Owner block created");
        Ok(restriction_id)
    })
}

/// Deletes an owner block if it still carries the observed version.
///
/// # Errors
///
/// - `PersistenceError::Conflict` if no owner block with that id and version
///   exists
/// - Any database error
pub fn delete_block(conn: &mut SqliteConnection, block: &BlockRef) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(
        room_restrictions::table
            .filter(room_restrictions::restriction_id.eq(block.restriction_id))
            .filter(room_restrictions::restriction_type.eq(RestrictionType::OwnerBlock.as_str()))
            .filter(room_restrictions::version.eq(block.version)),
    )
    .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::Conflict(format!(
            "owner block {} version {} no longer exists",
            block.restriction_id, block.version
        )));
    }

    info!(restriction_id = block.restriction_id, "Owner block deleted");
    Ok(())
}
