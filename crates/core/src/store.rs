// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::StoreError;
use bookings_domain::{BlockRef, Room, RoomRestriction, StayRange};
use time::Date;

/// Persistent record of room-unavailability intervals.
///
/// Every call is individually atomic. No call spans another: the engine never
/// asks for a transaction across calls.
///
/// Overlap is the half-open test used by `StayRange::overlaps`: a restriction
/// `r` overlaps `window` iff `window.start < r.end && r.start < window.end`.
pub trait RestrictionStore {
    /// Returns every restriction of `room_id` overlapping `window`, ordered by
    /// start date.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store fails.
    fn find_overlapping(
        &mut self,
        room_id: i64,
        window: StayRange,
    ) -> Result<Vec<RoomRestriction>, StoreError>;

    /// Counts the restrictions of `room_id` overlapping `window`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store fails.
    fn count_overlapping(&mut self, room_id: i64, window: StayRange) -> Result<usize, StoreError>;

    /// Returns every room with no restriction overlapping `window`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the store fails.
    fn find_available_rooms(&mut self, window: StayRange) -> Result<Vec<Room>, StoreError>;

    /// Creates a single-day owner block `[date, date + 1)` for `room_id` and
    /// returns its restriction id.
    ///
    /// The overlap check and the insert happen atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if the day is already restricted
    /// - `StoreError::NotFound` if the room does not exist
    /// - `StoreError::Unavailable` if the store fails
    fn insert_block(&mut self, room_id: i64, date: Date) -> Result<i64, StoreError>;

    /// Creates an owner block covering all of `stay` for `room_id` and returns
    /// its restriction id.
    ///
    /// Used to re-create the out-of-month part of a block that was deleted
    /// from the calendar. Same atomicity and errors as `insert_block`.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if any day of `stay` is already restricted
    /// - `StoreError::NotFound` if the room does not exist
    /// - `StoreError::Unavailable` if the store fails
    fn insert_block_range(&mut self, room_id: i64, stay: StayRange) -> Result<i64, StoreError>;

    /// Deletes the owner block referenced by `block`.
    ///
    /// The row is deleted only if it still exists, is an owner block, and
    /// carries `block.version`.
    ///
    /// # Errors
    ///
    /// - `StoreError::Conflict` if any of those checks fails
    /// - `StoreError::Unavailable` if the store fails
    fn delete_block(&mut self, block: &BlockRef) -> Result<(), StoreError>;
}
