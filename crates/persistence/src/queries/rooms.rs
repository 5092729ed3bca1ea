// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Room queries.

use bookings_domain::Room;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::rooms;
use crate::error::PersistenceError;

/// Diesel Queryable struct for room rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = rooms)]
pub(crate) struct RoomRow {
    room_id: i64,
    room_name: String,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            room_id: row.room_id,
            room_name: row.room_name,
        }
    }
}

/// Lists all rooms ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_rooms(conn: &mut SqliteConnection) -> Result<Vec<Room>, PersistenceError> {
    debug!("Listing all rooms");

    let rows: Vec<RoomRow> = rooms::table
        .select(RoomRow::as_select())
        .order_by(rooms::room_id.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Room::from).collect())
}

/// Retrieves a room by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the room is not found.
pub fn get_room(
    conn: &mut SqliteConnection,
    room_id: i64,
) -> Result<Option<Room>, PersistenceError> {
    debug!(room_id, "Looking up room");

    let row: Option<RoomRow> = rooms::table
        .filter(rooms::room_id.eq(room_id))
        .select(RoomRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Room::from))
}

/// Returns whether a room exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn room_exists(conn: &mut SqliteConnection, room_id: i64) -> Result<bool, PersistenceError> {
    use diesel::dsl::count;

    let count: i64 = rooms::table
        .filter(rooms::room_id.eq(room_id))
        .select(count(rooms::room_id))
        .first(conn)?;

    Ok(count > 0)
}
