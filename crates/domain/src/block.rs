// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Owner-block snapshots taken when the admin calendar is rendered.

use crate::calendar::CalendarMonth;
use crate::stay::StayRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// A reference to an owner-block restriction as it was observed.
///
/// Deleting through a `BlockRef` only succeeds while the stored row still
/// exists with the same id, type and version. Restriction rows are inserted
/// and deleted but never edited in place, and ids come from `AUTOINCREMENT`
/// so they are never reused: a block deleted and re-created since the
/// snapshot fails on its id. Every row is written with version 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockRef {
    /// The restriction identifier.
    pub restriction_id: i64,
    /// The version observed at snapshot time.
    pub version: i64,
}

impl BlockRef {
    /// Creates a new `BlockRef`.
    #[must_use]
    pub const fn new(restriction_id: i64, version: i64) -> Self {
        Self {
            restriction_id,
            version,
        }
    }
}

/// The owner blocks of one room within one calendar month.
///
/// Only days inside the month appear as keys. A multi-day block contributes
/// one entry per covered in-month day, all pointing at the same `BlockRef`.
/// Reservation restrictions never appear here.
///
/// The full stay of each block is kept beside the days, so the parts of a
/// block that cross the month boundary can be re-created when it is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSnapshot {
    room_id: i64,
    month: CalendarMonth,
    blocks: BTreeMap<Date, BlockRef>,
    spans: BTreeMap<i64, StayRange>,
}

impl BlockSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new(room_id: i64, month: CalendarMonth) -> Self {
        Self {
            room_id,
            month,
            blocks: BTreeMap::new(),
            spans: BTreeMap::new(),
        }
    }

    /// Returns the room.
    #[must_use]
    pub const fn room_id(&self) -> i64 {
        self.room_id
    }

    /// Returns the month the snapshot was taken for.
    #[must_use]
    pub const fn month(&self) -> CalendarMonth {
        self.month
    }

    /// Records a blocked day. Days outside the month are ignored.
    ///
    /// Returns whether the day was recorded.
    pub fn insert(&mut self, date: Date, block: BlockRef) -> bool {
        if !self.month.contains(date) {
            return false;
        }
        self.blocks.insert(date, block);
        true
    }

    /// Records the full stored stay of the block `restriction_id`.
    pub fn record_span(&mut self, restriction_id: i64, stay: StayRange) {
        self.spans.insert(restriction_id, stay);
    }

    /// Returns the full stored stay of a block, if it was recorded.
    #[must_use]
    pub fn span(&self, restriction_id: i64) -> Option<StayRange> {
        self.spans.get(&restriction_id).copied()
    }

    /// Iterates over the recorded block stays, by restriction id.
    pub fn spans(&self) -> impl Iterator<Item = (i64, StayRange)> + '_ {
        self.spans.iter().map(|(id, stay)| (*id, *stay))
    }

    /// Returns the parts of a block's stay lying before or after the month.
    ///
    /// Empty when the block lies within the month or its stay is unknown.
    #[must_use]
    pub fn out_of_month_parts(&self, restriction_id: i64) -> Vec<StayRange> {
        let Some(stay) = self.span(restriction_id) else {
            return Vec::new();
        };
        let window: StayRange = self.month.window();
        [
            StayRange::new(stay.start(), window.start().min(stay.end())),
            StayRange::new(window.end().max(stay.start()), stay.end()),
        ]
        .into_iter()
        .filter_map(Result::ok)
        .collect()
    }

    /// Returns the block covering `date`, if any.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<&BlockRef> {
        self.blocks.get(&date)
    }

    /// Returns whether `date` is blocked in the snapshot.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.blocks.contains_key(&date)
    }

    /// Returns the number of blocked days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns whether no day is blocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over blocked days in date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, BlockRef)> + '_ {
        self.blocks.iter().map(|(date, block)| (*date, *block))
    }
}
