// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod availability;
mod error;
mod reconcile;
mod session;
mod snapshot;
mod store;
mod submission;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use availability::{available_rooms, is_room_available};
pub use error::{CoreError, StoreError};
pub use reconcile::{
    BlockOperation, OperationOutcome, ReconciliationEntry, ReconciliationReport, apply_operations,
    plan_reconciliation, plan_room, reconcile_calendar,
};
pub use session::{FLASH_KEY, Flash, FlashLevel, SessionState};
pub use snapshot::{
    BLOCK_MAP_KEY_PREFIX, MonthCalendar, RoomCalendar, block_map_key, build_month_calendar,
    load_snapshot, stage_snapshots,
};
pub use store::RestrictionStore;
pub use submission::CalendarSubmission;
