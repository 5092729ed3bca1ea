// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `rooms`: Room queries
//! - `restrictions`: Overlap and availability queries on room restrictions
//! - `reservations`: Reservation listing and lookup
//! - `users`: Staff user, session and session value queries

pub mod reservations;
pub mod restrictions;
pub mod rooms;
pub mod users;
