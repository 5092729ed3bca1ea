// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use crate::store::RestrictionStore;
use bookings_domain::{Room, StayRange};
use tracing::debug;

/// Returns whether `room_id` is free for the whole of `stay`.
///
/// A room is free iff no restriction of any type overlaps `stay`. Adjacent
/// intervals do not overlap, so a stay may start on another stay's checkout
/// day.
///
/// # Errors
///
/// Propagates any store failure unchanged. A failure means availability is
/// unknown, never that the room is free or taken.
pub fn is_room_available<S: RestrictionStore + ?Sized>(
    store: &mut S,
    room_id: i64,
    stay: StayRange,
) -> Result<bool, StoreError> {
    let overlapping: usize = store.count_overlapping(room_id, stay)?;
    debug!(room_id, %stay, overlapping, "Checked room availability");
    Ok(overlapping == 0)
}

/// Returns every room free for the whole of `stay`, sorted by room id.
///
/// An empty list means no room is free. It is not an error.
///
/// # Errors
///
/// Propagates any store failure unchanged.
pub fn available_rooms<S: RestrictionStore + ?Sized>(
    store: &mut S,
    stay: StayRange,
) -> Result<Vec<Room>, StoreError> {
    let mut rooms: Vec<Room> = store.find_available_rooms(stay)?;
    rooms.sort_by_key(|room| room.room_id);
    debug!(%stay, available = rooms.len(), "Searched availability for all rooms");
    Ok(rooms)
}
