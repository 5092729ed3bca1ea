// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL, with inserted row ids read back through the
//! `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `rooms`: Room creation
//! - `restrictions`: Owner block insertion and version-checked deletion
//! - `reservations`: Reservation and paired restriction lifecycle
//! - `users`: Staff user, session and session value mutations

pub mod reservations;
pub mod restrictions;
pub mod rooms;
pub mod users;
