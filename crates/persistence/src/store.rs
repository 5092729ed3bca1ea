// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `RestrictionStore` backed by the `room_restrictions` table.

use bookings::{RestrictionStore, StoreError};
use bookings_domain::{BlockRef, Room, RoomRestriction, StayRange};
use time::Date;

use crate::Persistence;
use crate::mutations::restrictions as restriction_mutations;
use crate::queries::restrictions as restriction_queries;

impl RestrictionStore for Persistence {
    fn find_overlapping(
        &mut self,
        room_id: i64,
        window: StayRange,
    ) -> Result<Vec<RoomRestriction>, StoreError> {
        Ok(restriction_queries::find_overlapping(
            &mut self.conn,
            room_id,
            window,
        )?)
    }

    fn count_overlapping(&mut self, room_id: i64, window: StayRange) -> Result<usize, StoreError> {
        Ok(restriction_queries::count_overlapping(
            &mut self.conn,
            room_id,
            window,
        )?)
    }

    fn find_available_rooms(&mut self, window: StayRange) -> Result<Vec<Room>, StoreError> {
        Ok(restriction_queries::find_available_rooms(
            &mut self.conn,
            window,
        )?)
    }

    fn insert_block(&mut self, room_id: i64, date: Date) -> Result<i64, StoreError> {
        Ok(restriction_mutations::insert_block(
            &mut self.conn,
            room_id,
            date,
        )?)
    }

    fn insert_block_range(&mut self, room_id: i64, stay: StayRange) -> Result<i64, StoreError> {
        Ok(restriction_mutations::insert_block_range(
            &mut self.conn,
            room_id,
            stay,
        )?)
    }

    fn delete_block(&mut self, block: &BlockRef) -> Result<(), StoreError> {
        Ok(restriction_mutations::delete_block(&mut self.conn, block)?)
    }
}
