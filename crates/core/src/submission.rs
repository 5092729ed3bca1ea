// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Decoding of the admin calendar form.
//!
//! Three field shapes carry intent, all suffixed with `{room_id}_{YYYY-MM-DD}`:
//!
//! - `keep_block_*` present: the blocked day stays blocked
//! - `add_block_*` present: the open day becomes blocked
//! - `block_*=keep|remove|add`: explicit intent, wins over the flags above
//!
//! Any other field is ignored.

use crate::error::CoreError;
use bookings_domain::{BlockIntent, CalendarCell, CalendarMonth, parse_iso_date};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;

const KEEP_PREFIX: &str = "keep_block_";
const ADD_PREFIX: &str = "add_block_";
const EXPLICIT_PREFIX: &str = "block_";

/// The decoded intents of one calendar submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSubmission {
    month: CalendarMonth,
    intents: BTreeMap<i64, BTreeMap<Date, BlockIntent>>,
}

impl CalendarSubmission {
    /// Creates a submission with no intents.
    #[must_use]
    pub const fn new(month: CalendarMonth) -> Self {
        Self {
            month,
            intents: BTreeMap::new(),
        }
    }

    /// Decodes submitted form fields for `month`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSubmission` if an intent field has a
    /// malformed room id, date or value, or names a day outside `month`.
    pub fn from_form(month: CalendarMonth, fields: &[(String, String)]) -> Result<Self, CoreError> {
        let mut flagged: BTreeMap<CalendarCell, BlockIntent> = BTreeMap::new();
        let mut explicit: BTreeMap<CalendarCell, BlockIntent> = BTreeMap::new();

        for (name, value) in fields {
            if let Some(suffix) = name.strip_prefix(KEEP_PREFIX) {
                let cell: CalendarCell = parse_cell(name, suffix, month)?;
                // an add flag on the same day is the stronger request
                flagged.entry(cell).or_insert(BlockIntent::Keep);
            } else if let Some(suffix) = name.strip_prefix(ADD_PREFIX) {
                let cell: CalendarCell = parse_cell(name, suffix, month)?;
                flagged.insert(cell, BlockIntent::Add);
            } else if let Some(suffix) = name.strip_prefix(EXPLICIT_PREFIX) {
                let cell: CalendarCell = parse_cell(name, suffix, month)?;
                let intent: BlockIntent = value.parse::<BlockIntent>().map_err(|_| {
                    CoreError::InvalidSubmission {
                        field: name.clone(),
                        reason: format!("'{value}' is not one of keep, remove, add"),
                    }
                })?;
                explicit.insert(cell, intent);
            }
        }

        let mut submission: Self = Self::new(month);
        for (cell, intent) in flagged.into_iter().chain(explicit) {
            submission.set(cell, intent);
        }
        Ok(submission)
    }

    /// Records `intent` for `cell`, replacing any earlier intent.
    pub fn set(&mut self, cell: CalendarCell, intent: BlockIntent) {
        self.intents
            .entry(cell.room_id)
            .or_default()
            .insert(cell.date, intent);
    }

    /// Returns the submitted month.
    #[must_use]
    pub const fn month(&self) -> CalendarMonth {
        self.month
    }

    /// Returns the intents submitted for `room_id`, keyed by day.
    #[must_use]
    pub fn intents_for(&self, room_id: i64) -> Option<&BTreeMap<Date, BlockIntent>> {
        self.intents.get(&room_id)
    }

    /// Returns the intent submitted for `cell`, if any.
    #[must_use]
    pub fn intent(&self, cell: CalendarCell) -> Option<BlockIntent> {
        self.intents
            .get(&cell.room_id)
            .and_then(|days| days.get(&cell.date))
            .copied()
    }

    /// Returns every room that has at least one intent.
    #[must_use]
    pub fn room_ids(&self) -> BTreeSet<i64> {
        self.intents.keys().copied().collect()
    }
}

fn parse_cell(field: &str, suffix: &str, month: CalendarMonth) -> Result<CalendarCell, CoreError> {
    let invalid = |reason: String| CoreError::InvalidSubmission {
        field: field.to_string(),
        reason,
    };

    let (room, day) = suffix
        .split_once('_')
        .ok_or_else(|| invalid(String::from("expected {room_id}_{YYYY-MM-DD}")))?;

    let room_id: i64 = room
        .parse()
        .ok()
        .filter(|id: &i64| *id > 0)
        .ok_or_else(|| invalid(format!("'{room}' is not a room id")))?;

    let date: Date = parse_iso_date(day).map_err(|e| invalid(e.to_string()))?;
    if !month.contains(date) {
        return Err(invalid(format!("{day} is outside {month}")));
    }

    Ok(CalendarCell { room_id, date })
}
