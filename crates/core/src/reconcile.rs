// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation of a calendar submission against the staged snapshots.
//!
//! For each room independently:
//!
//! 1. Every snapshot day whose intent is `Remove`, or which has no intent at
//!    all, deletes its block.
//! 2. Every `Add` day that is not in the snapshot inserts a single-day block.
//! 3. A deleted block that reached past the month has its out-of-month part
//!    re-created, so editing one month never clears days of another.
//!
//! Deletes run before inserts. Every call stands alone: a failed call is
//! logged and recorded in the report, and the remaining calls still run.
//! The live store is never read back; the snapshot is the baseline.

use crate::error::StoreError;
use crate::session::{Flash, SessionState};
use crate::snapshot::load_snapshot;
use crate::store::RestrictionStore;
use crate::submission::CalendarSubmission;
use bookings_domain::{
    BlockIntent, BlockRef, BlockSnapshot, CalendarMonth, StayRange, format_iso_date,
};
use std::collections::{BTreeMap, BTreeSet};
use time::Date;
use tracing::{info, warn};

/// A single write the reconciliation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOperation {
    /// Delete an owner block.
    Delete {
        /// The room the block belongs to.
        room_id: i64,
        /// The first in-month day the block covered.
        date: Date,
        /// The block as observed in the snapshot.
        block: BlockRef,
    },
    /// Create a single-day owner block.
    Insert {
        /// The room to block.
        room_id: i64,
        /// The day to block.
        date: Date,
    },
    /// Re-create the part of a deleted block lying outside the month.
    Restore {
        /// The room to block.
        room_id: i64,
        /// The out-of-month days of the deleted block.
        stay: StayRange,
    },
}

impl BlockOperation {
    /// Returns the room the operation targets.
    #[must_use]
    pub const fn room_id(&self) -> i64 {
        match self {
            Self::Delete { room_id, .. }
            | Self::Insert { room_id, .. }
            | Self::Restore { room_id, .. } => *room_id,
        }
    }

    /// Returns whether this is a delete.
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        matches!(self, Self::Delete { .. })
    }
}

impl std::fmt::Display for BlockOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete {
                room_id,
                date,
                block,
            } => write!(
                f,
                "delete block {} (room {room_id}, {})",
                block.restriction_id,
                format_iso_date(*date)
            ),
            Self::Insert { room_id, date } => {
                write!(
                    f,
                    "insert block (room {room_id}, {})",
                    format_iso_date(*date)
                )
            }
            Self::Restore { room_id, stay } => {
                write!(f, "restore block (room {room_id}, {stay})")
            }
        }
    }
}

/// What happened to one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The store applied the write.
    Applied,
    /// The store refused the write because live state differs from the
    /// snapshot.
    Conflict(String),
    /// The store failed. The write may or may not have happened.
    Failed(String),
}

/// One attempted operation and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationEntry {
    /// The operation.
    pub operation: BlockOperation,
    /// Its outcome.
    pub outcome: OperationOutcome,
}

/// Everything a reconciliation attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// The reconciled month.
    pub month: CalendarMonth,
    /// Attempted operations, in execution order.
    pub entries: Vec<ReconciliationEntry>,
}

impl ReconciliationReport {
    fn count(&self, wanted: fn(&OperationOutcome) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| wanted(&entry.outcome))
            .count()
    }

    /// Returns the number of applied operations.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.count(|outcome| matches!(outcome, OperationOutcome::Applied))
    }

    /// Returns the number of conflicting operations.
    #[must_use]
    pub fn conflicts(&self) -> usize {
        self.count(|outcome| matches!(outcome, OperationOutcome::Conflict(_)))
    }

    /// Returns the number of failed operations.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.count(|outcome| matches!(outcome, OperationOutcome::Failed(_)))
    }

    /// Returns whether every operation was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.applied() == self.entries.len()
    }

    /// Returns the flash message describing this report.
    #[must_use]
    pub fn flash(&self) -> Flash {
        if self.is_clean() {
            return Flash::success(&format!(
                "Calendar for {} saved ({} change(s))",
                self.month,
                self.applied()
            ));
        }
        Flash::warning(&format!(
            "Calendar for {} partly saved: {} applied, {} changed by someone else, {} failed",
            self.month,
            self.applied(),
            self.conflicts(),
            self.failures()
        ))
    }
}

/// Computes the operations for one room.
///
/// `snapshot` is `None` when no baseline exists for the room; only inserts
/// are produced then.
///
/// A block spanning several snapshot days is deleted once. If some of its
/// days are still wanted, those days are re-blocked individually after the
/// delete. Its days outside the month are restored as one block per side.
#[must_use]
pub fn plan_room(
    room_id: i64,
    snapshot: Option<&BlockSnapshot>,
    intents: Option<&BTreeMap<Date, BlockIntent>>,
) -> Vec<BlockOperation> {
    let intent_for = |date: Date| intents.and_then(|days| days.get(&date)).copied();
    let wants_blocked = |date: Date| intent_for(date).is_some_and(|intent| intent.wants_blocked());

    let mut deleted: BTreeSet<i64> = BTreeSet::new();
    let mut deletes: Vec<BlockOperation> = Vec::new();
    let mut restores: Vec<BlockOperation> = Vec::new();
    let mut inserts: BTreeSet<Date> = BTreeSet::new();

    if let Some(snapshot) = snapshot {
        for (date, block) in snapshot.iter() {
            if wants_blocked(date) || deleted.contains(&block.restriction_id) {
                continue;
            }
            deleted.insert(block.restriction_id);
            deletes.push(BlockOperation::Delete {
                room_id,
                date,
                block,
            });
            restores.extend(
                snapshot
                    .out_of_month_parts(block.restriction_id)
                    .into_iter()
                    .map(|stay| BlockOperation::Restore { room_id, stay }),
            );
        }

        // days of a deleted block the admin still wants
        for (date, block) in snapshot.iter() {
            if deleted.contains(&block.restriction_id) && wants_blocked(date) {
                inserts.insert(date);
            }
        }
    }

    if let Some(days) = intents {
        for (date, intent) in days {
            let in_snapshot: bool = snapshot.is_some_and(|s| s.contains(*date));
            if *intent == BlockIntent::Add && !in_snapshot {
                inserts.insert(*date);
            }
        }
    }

    deletes
        .into_iter()
        .chain(restores)
        .chain(
            inserts
                .into_iter()
                .map(|date| BlockOperation::Insert { room_id, date }),
        )
        .collect()
}

/// Computes every operation for `submission`, deletes first.
///
/// `room_ids` lists the rooms shown on the calendar. Rooms that only appear
/// in the submission are reconciled too, with no baseline.
#[must_use]
pub fn plan_reconciliation(
    session: &SessionState,
    room_ids: &[i64],
    submission: &CalendarSubmission,
) -> Vec<BlockOperation> {
    let month: CalendarMonth = submission.month();
    let rooms: BTreeSet<i64> = room_ids
        .iter()
        .copied()
        .chain(submission.room_ids())
        .collect();

    let (deletes, inserts): (Vec<BlockOperation>, Vec<BlockOperation>) = rooms
        .into_iter()
        .flat_map(|room_id| {
            let snapshot: Option<BlockSnapshot> = load_snapshot(session, room_id, month);
            plan_room(room_id, snapshot.as_ref(), submission.intents_for(room_id))
        })
        .partition(BlockOperation::is_delete);

    deletes.into_iter().chain(inserts).collect()
}

/// Applies `operations` to `store`, one call each, never stopping early.
pub fn apply_operations<S: RestrictionStore + ?Sized>(
    store: &mut S,
    month: CalendarMonth,
    operations: Vec<BlockOperation>,
) -> ReconciliationReport {
    let mut entries: Vec<ReconciliationEntry> = Vec::with_capacity(operations.len());

    for operation in operations {
        let result: Result<(), StoreError> = match operation {
            BlockOperation::Delete { block, .. } => store.delete_block(&block),
            BlockOperation::Insert { room_id, date } => {
                store.insert_block(room_id, date).map(|_| ())
            }
            BlockOperation::Restore { room_id, stay } => {
                store.insert_block_range(room_id, stay).map(|_| ())
            }
        };

        let outcome: OperationOutcome = match result {
            Ok(()) => {
                info!(%operation, "Applied calendar change");
                OperationOutcome::Applied
            }
            Err(StoreError::Conflict(reason)) => {
                warn!(%operation, %reason, "Calendar change conflicts with stored state");
                OperationOutcome::Conflict(reason)
            }
            Err(e) => {
                warn!(%operation, error = %e, "Calendar change failed");
                OperationOutcome::Failed(e.to_string())
            }
        };

        entries.push(ReconciliationEntry { operation, outcome });
    }

    ReconciliationReport { month, entries }
}

/// Reconciles `submission` against the snapshots staged in `session`.
///
/// Never fails as a whole: per-operation problems are in the report.
pub fn reconcile_calendar<S: RestrictionStore + ?Sized>(
    store: &mut S,
    session: &SessionState,
    room_ids: &[i64],
    submission: &CalendarSubmission,
) -> ReconciliationReport {
    let operations: Vec<BlockOperation> = plan_reconciliation(session, room_ids, submission);
    let report: ReconciliationReport = apply_operations(store, submission.month(), operations);

    info!(
        month = %report.month,
        applied = report.applied(),
        conflicts = report.conflicts(),
        failures = report.failures(),
        "Reconciled calendar submission"
    );
    report
}
