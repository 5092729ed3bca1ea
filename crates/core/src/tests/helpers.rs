// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory `RestrictionStore` with scripted faults and a call log.

use crate::{RestrictionStore, StoreError};
use bookings_domain::{BlockRef, RestrictionType, Room, RoomRestriction, StayRange};
use time::Date;

/// A recorded store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    FindOverlapping { room_id: i64, window: StayRange },
    CountOverlapping { room_id: i64, window: StayRange },
    FindAvailableRooms { window: StayRange },
    InsertBlock { room_id: i64, date: Date },
    InsertBlockRange { room_id: i64, stay: StayRange },
    DeleteBlock { restriction_id: i64, version: i64 },
}

impl StoreCall {
    pub const fn is_write(&self) -> bool {
        matches!(
            self,
            Self::InsertBlock { .. } | Self::InsertBlockRange { .. } | Self::DeleteBlock { .. }
        )
    }
}

/// The response scripted for a matching call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Fail with `StoreError::Unavailable` without touching state.
    Unavailable,
    /// Fail with `StoreError::Conflict` without touching state.
    Conflict,
}

pub struct ScriptedStore {
    rooms: Vec<Room>,
    restrictions: Vec<RoomRestriction>,
    next_id: i64,
    script: Vec<(StoreCall, Fault)>,
    pub calls: Vec<StoreCall>,
}

impl ScriptedStore {
    pub fn with_rooms(count: i64) -> Self {
        Self {
            rooms: (1..=count)
                .map(|id| Room::new(id, &format!("Room {id}")))
                .collect(),
            restrictions: Vec::new(),
            next_id: 1,
            script: Vec::new(),
            calls: Vec::new(),
        }
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.clone()
    }

    pub fn room_ids(&self) -> Vec<i64> {
        self.rooms.iter().map(|room| room.room_id).collect()
    }

    /// Makes every future call equal to `call` fail with `fault`.
    pub fn script(&mut self, call: StoreCall, fault: Fault) {
        self.script.push((call, fault));
    }

    pub fn add_reservation(&mut self, room_id: i64, start: Date, end: Date) -> i64 {
        let id: i64 = self.next_id;
        self.next_id += 1;
        let stay: StayRange = StayRange::new(start, end).unwrap();
        self.restrictions.push(
            RoomRestriction::new(id, room_id, stay, RestrictionType::Reservation, Some(id), 1)
                .unwrap(),
        );
        id
    }

    pub fn add_block(&mut self, room_id: i64, start: Date, end: Date) -> i64 {
        let id: i64 = self.next_id;
        self.next_id += 1;
        let stay: StayRange = StayRange::new(start, end).unwrap();
        self.restrictions.push(
            RoomRestriction::new(id, room_id, stay, RestrictionType::OwnerBlock, None, 1).unwrap(),
        );
        id
    }

    /// Replaces a block's row with a newer version, as a concurrent edit would.
    pub fn bump_version(&mut self, restriction_id: i64) {
        if let Some(row) = self
            .restrictions
            .iter_mut()
            .find(|row| row.restriction_id == restriction_id)
        {
            row.version += 1;
        }
    }

    pub fn remove(&mut self, restriction_id: i64) {
        self.restrictions
            .retain(|row| row.restriction_id != restriction_id);
    }

    pub fn restriction(&self, restriction_id: i64) -> Option<&RoomRestriction> {
        self.restrictions
            .iter()
            .find(|row| row.restriction_id == restriction_id)
    }

    pub fn blocks_of(&self, room_id: i64) -> Vec<StayRange> {
        let mut stays: Vec<StayRange> = self
            .restrictions
            .iter()
            .filter(|row| row.room_id == room_id && row.is_owner_block())
            .map(|row| row.stay)
            .collect();
        stays.sort_by_key(StayRange::start);
        stays
    }

    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls.iter().copied().filter(StoreCall::is_write).collect()
    }

    fn record(&mut self, call: StoreCall) -> Result<(), StoreError> {
        self.calls.push(call);
        match self.script.iter().find(|(scripted, _)| *scripted == call) {
            Some((_, Fault::Unavailable)) => {
                Err(StoreError::Unavailable(format!("scripted failure: {call:?}")))
            }
            Some((_, Fault::Conflict)) => {
                Err(StoreError::Conflict(format!("scripted conflict: {call:?}")))
            }
            None => Ok(()),
        }
    }

    fn insert_owner_block(&mut self, room_id: i64, stay: StayRange) -> Result<i64, StoreError> {
        if !self.rooms.iter().any(|room| room.room_id == room_id) {
            return Err(StoreError::NotFound(room_id));
        }
        if !self.overlapping(room_id, stay).is_empty() {
            return Err(StoreError::Conflict(format!(
                "room {room_id} is already restricted during {stay}"
            )));
        }
        Ok(self.add_block(room_id, stay.start(), stay.end()))
    }

    fn overlapping(&self, room_id: i64, window: StayRange) -> Vec<RoomRestriction> {
        let mut rows: Vec<RoomRestriction> = self
            .restrictions
            .iter()
            .filter(|row| row.room_id == room_id && row.stay.overlaps(&window))
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.stay.start());
        rows
    }
}

impl RestrictionStore for ScriptedStore {
    fn find_overlapping(
        &mut self,
        room_id: i64,
        window: StayRange,
    ) -> Result<Vec<RoomRestriction>, StoreError> {
        self.record(StoreCall::FindOverlapping { room_id, window })?;
        Ok(self.overlapping(room_id, window))
    }

    fn count_overlapping(&mut self, room_id: i64, window: StayRange) -> Result<usize, StoreError> {
        self.record(StoreCall::CountOverlapping { room_id, window })?;
        Ok(self.overlapping(room_id, window).len())
    }

    fn find_available_rooms(&mut self, window: StayRange) -> Result<Vec<Room>, StoreError> {
        self.record(StoreCall::FindAvailableRooms { window })?;
        // reverse order so callers that rely on sorting are exercised
        Ok(self
            .rooms
            .iter()
            .rev()
            .filter(|room| self.overlapping(room.room_id, window).is_empty())
            .cloned()
            .collect())
    }

    fn insert_block(&mut self, room_id: i64, date: Date) -> Result<i64, StoreError> {
        self.record(StoreCall::InsertBlock { room_id, date })?;
        let stay: StayRange =
            StayRange::single_day(date).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        self.insert_owner_block(room_id, stay)
    }

    fn insert_block_range(&mut self, room_id: i64, stay: StayRange) -> Result<i64, StoreError> {
        self.record(StoreCall::InsertBlockRange { room_id, stay })?;
        self.insert_owner_block(room_id, stay)
    }

    fn delete_block(&mut self, block: &BlockRef) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteBlock {
            restriction_id: block.restriction_id,
            version: block.version,
        })?;
        let matches: bool = self.restriction(block.restriction_id).is_some_and(|row| {
            row.is_owner_block() && row.version == block.version
        });
        if !matches {
            return Err(StoreError::Conflict(format!(
                "block {} changed since it was read",
                block.restriction_id
            )));
        }
        self.remove(block.restriction_id);
        Ok(())
    }
}
