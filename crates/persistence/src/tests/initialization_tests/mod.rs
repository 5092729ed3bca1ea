// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test opens an in-memory database, so connection
//! setup and migrations are exercised throughout. These cover the remaining
//! startup checks.

use diesel::RunQueryDsl;
use diesel::prelude::*;
use diesel::sql_types::Text;

use crate::{Persistence, PersistenceError};

#[derive(QueryableByName)]
struct JournalModeRow {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

fn journal_mode(persistence: &mut Persistence) -> String {
    diesel::sql_query("PRAGMA journal_mode")
        .get_result::<JournalModeRow>(&mut persistence.conn)
        .unwrap()
        .journal_mode
}

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_database_keeps_rollback_journal() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(journal_mode(&mut persistence), "memory");
}

#[test]
fn test_busy_timeout_can_be_set() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.set_busy_timeout(2500).is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = Persistence::new_in_memory().unwrap();
    let mut db2 = Persistence::new_in_memory().unwrap();

    db1.create_room("Garden Room").unwrap();

    assert_eq!(db1.list_rooms().unwrap().len(), 1, "db1 should have 1 room");
    assert_eq!(db2.list_rooms().unwrap().len(), 0, "db2 should be empty");
}

#[test]
fn test_file_database_persists_between_connections() {
    let dir = std::env::temp_dir().join(format!("bookings-init-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bookings.db");
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        persistence.create_room("Attic").unwrap();
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    assert_eq!(journal_mode(&mut reopened), "wal");
    let rooms = reopened.list_rooms().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_name, "Attic");

    drop(reopened);
    let _ = std::fs::remove_dir_all(&dir);
}
