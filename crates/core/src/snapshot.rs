// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Month calendar views and the owner-block snapshots staged with them.
//!
//! Rendering the admin calendar reads every restriction overlapping the month
//! once per room. Reservation days become read-only cells; owner-block days
//! become editable cells and are recorded in a `BlockSnapshot`. The snapshots
//! are staged in the session and become the only baseline the next calendar
//! submission is reconciled against.

use crate::error::{CoreError, StoreError};
use crate::session::SessionState;
use crate::store::RestrictionStore;
use bookings_domain::{
    BlockRef, BlockSnapshot, CalendarMonth, DayState, RestrictionType, Room, RoomRestriction,
    StayRange, format_iso_date, parse_iso_date,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;
use tracing::{debug, info, warn};

/// Session key prefix for staged snapshots.
pub const BLOCK_MAP_KEY_PREFIX: &str = "block_map_";

/// Returns the session key holding the staged snapshot of `room_id`.
#[must_use]
pub fn block_map_key(room_id: i64) -> String {
    format!("{BLOCK_MAP_KEY_PREFIX}{room_id}")
}

/// One room's row on the month calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCalendar {
    /// The room.
    pub room: Room,
    /// The state of every day of the month.
    pub days: BTreeMap<Date, DayState>,
    /// The owner blocks in the month.
    pub blocks: BlockSnapshot,
}

/// The admin calendar for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCalendar {
    /// The month shown.
    pub month: CalendarMonth,
    /// One row per room, in the order the rooms were given.
    pub rooms: Vec<RoomCalendar>,
}

/// Builds the calendar of `month` for `rooms`.
///
/// # Errors
///
/// Returns the first store failure. No partial calendar is produced.
pub fn build_month_calendar<S: RestrictionStore + ?Sized>(
    store: &mut S,
    rooms: &[Room],
    month: CalendarMonth,
) -> Result<MonthCalendar, StoreError> {
    let window: StayRange = month.window();
    let mut calendars: Vec<RoomCalendar> = Vec::with_capacity(rooms.len());

    for room in rooms {
        let restrictions: Vec<RoomRestriction> = store.find_overlapping(room.room_id, window)?;
        calendars.push(build_room_calendar(room, month, &restrictions));
    }

    debug!(%month, rooms = calendars.len(), "Built month calendar");
    Ok(MonthCalendar {
        month,
        rooms: calendars,
    })
}

fn build_room_calendar(
    room: &Room,
    month: CalendarMonth,
    restrictions: &[RoomRestriction],
) -> RoomCalendar {
    let window: StayRange = month.window();
    let mut days: BTreeMap<Date, DayState> =
        month.days().map(|day| (day, DayState::Open)).collect();
    let mut blocks: BlockSnapshot = BlockSnapshot::new(room.room_id, month);

    for restriction in restrictions {
        let Some(in_month) = restriction.stay.intersection(&window) else {
            continue;
        };

        match restriction.restriction_type {
            RestrictionType::Reservation => {
                for day in in_month.days() {
                    days.insert(
                        day,
                        DayState::Reserved {
                            restriction_id: restriction.restriction_id,
                            reservation_id: restriction.reservation_id,
                        },
                    );
                }
            }
            RestrictionType::OwnerBlock => {
                let block: BlockRef =
                    BlockRef::new(restriction.restriction_id, restriction.version);
                blocks.record_span(restriction.restriction_id, restriction.stay);
                for day in in_month.days() {
                    blocks.insert(day, block);
                    // a reservation on the same day keeps the cell read-only
                    if days.get(&day) == Some(&DayState::Open) {
                        days.insert(
                            day,
                            DayState::Blocked {
                                restriction_id: restriction.restriction_id,
                            },
                        );
                    }
                }
            }
        }
    }

    RoomCalendar {
        room: room.clone(),
        days,
        blocks,
    }
}

/// The serialized form of a `BlockSnapshot` inside the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StagedSnapshot {
    room_id: i64,
    year: i32,
    month: u8,
    blocks: BTreeMap<String, BlockRef>,
    #[serde(default)]
    spans: BTreeMap<i64, StagedSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StagedSpan {
    start: String,
    end: String,
}

impl From<&BlockSnapshot> for StagedSnapshot {
    fn from(snapshot: &BlockSnapshot) -> Self {
        Self {
            room_id: snapshot.room_id(),
            year: snapshot.month().year(),
            month: snapshot.month().month_number(),
            blocks: snapshot
                .iter()
                .map(|(day, block)| (format_iso_date(day), block))
                .collect(),
            spans: snapshot
                .spans()
                .map(|(restriction_id, stay)| {
                    let span: StagedSpan = StagedSpan {
                        start: format_iso_date(stay.start()),
                        end: format_iso_date(stay.end()),
                    };
                    (restriction_id, span)
                })
                .collect(),
        }
    }
}

impl StagedSnapshot {
    fn into_snapshot(self) -> Result<BlockSnapshot, CoreError> {
        let month: CalendarMonth = CalendarMonth::new(self.year, self.month)?;
        let mut snapshot: BlockSnapshot = BlockSnapshot::new(self.room_id, month);
        for (day, block) in self.blocks {
            snapshot.insert(parse_iso_date(&day)?, block);
        }
        for (restriction_id, span) in self.spans {
            snapshot.record_span(restriction_id, StayRange::parse(&span.start, &span.end)?);
        }
        Ok(snapshot)
    }
}

/// Writes every room's snapshot to the session, replacing earlier ones.
///
/// # Errors
///
/// Returns `CoreError::Session` if a snapshot cannot be encoded.
pub fn stage_snapshots(
    session: &mut SessionState,
    calendar: &MonthCalendar,
) -> Result<(), CoreError> {
    for room in &calendar.rooms {
        let staged: StagedSnapshot = StagedSnapshot::from(&room.blocks);
        session.put_json(&block_map_key(room.room.room_id), &staged)?;
    }
    info!(
        month = %calendar.month,
        rooms = calendar.rooms.len(),
        "Staged calendar snapshots"
    );
    Ok(())
}

/// Loads the staged snapshot of `room_id` for `month`.
///
/// Returns `None` when nothing is staged for the room, when the staged value
/// cannot be read, or when it was taken for a different month. Each of those
/// means the server has no baseline for the room.
#[must_use]
pub fn load_snapshot(
    session: &SessionState,
    room_id: i64,
    month: CalendarMonth,
) -> Option<BlockSnapshot> {
    let key: String = block_map_key(room_id);
    let staged: StagedSnapshot = match session.get_json::<StagedSnapshot>(&key) {
        Ok(Some(staged)) => staged,
        Ok(None) => {
            warn!(room_id, %month, "No staged calendar snapshot for room");
            return None;
        }
        Err(e) => {
            warn!(room_id, error = %e, "Discarding unreadable calendar snapshot");
            return None;
        }
    };

    let snapshot: BlockSnapshot = match staged.into_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(room_id, error = %e, "Discarding unreadable calendar snapshot");
            return None;
        }
    };

    if snapshot.room_id() != room_id || snapshot.month() != month {
        warn!(
            room_id,
            staged_month = %snapshot.month(),
            submitted_month = %month,
            "Staged calendar snapshot is for a different month"
        );
        return None;
    }

    Some(snapshot)
}
