// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bookings_domain::Room;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::rooms;
use crate::error::PersistenceError;

/// Creates a new room.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `room_name` - The display name
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_room(conn: &mut SqliteConnection, room_name: &str) -> Result<Room, PersistenceError> {
    let room_name: &str = room_name.trim();

    diesel::insert_into(rooms::table)
        .values(rooms::room_name.eq(room_name))
        .execute(conn)?;

    let room_id: i64 = conn.inserted_row_id()?;

    info!(room_id, room_name, "Room created");
    Ok(Room::new(room_id, room_name))
}
