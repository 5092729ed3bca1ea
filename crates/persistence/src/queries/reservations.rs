// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation queries.

use bookings_domain::{GuestDetails, Reservation, StayRange, parse_iso_date};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::ReservationData;
use crate::diesel_schema::{reservations, rooms};
use crate::error::PersistenceError;

/// Diesel Queryable struct for reservation rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = reservations)]
struct ReservationRow {
    reservation_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    room_id: i64,
    start_date: String,
    end_date: String,
    processed: i32,
    created_at: String,
    updated_at: String,
}

fn to_reservation_data(
    row: ReservationRow,
    room_name: String,
) -> Result<ReservationData, PersistenceError> {
    let stay: StayRange = StayRange::new(
        parse_iso_date(&row.start_date)?,
        parse_iso_date(&row.end_date)?,
    )?;
    let guest: GuestDetails = GuestDetails {
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        phone: row.phone,
    };

    Ok(ReservationData {
        reservation: Reservation::with_id(
            row.reservation_id,
            row.room_id,
            stay,
            guest,
            row.processed != 0,
        ),
        room_name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Lists reservations, newest stay first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `unprocessed_only` - Whether to skip processed reservations
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_reservations(
    conn: &mut SqliteConnection,
    unprocessed_only: bool,
) -> Result<Vec<ReservationData>, PersistenceError> {
    debug!(unprocessed_only, "Listing reservations");

    // processed is stored as 0 or 1
    let max_processed: i32 = i32::from(!unprocessed_only);

    let rows: Vec<(ReservationRow, String)> = reservations::table
        .inner_join(rooms::table)
        .filter(reservations::processed.le(max_processed))
        .select((ReservationRow::as_select(), rooms::room_name))
        .order_by((
            reservations::start_date.desc(),
            reservations::reservation_id.desc(),
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(row, room_name)| to_reservation_data(row, room_name))
        .collect()
}

/// Retrieves a reservation by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row is malformed.
/// Returns `Ok(None)` if the reservation is not found.
pub fn get_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<Option<ReservationData>, PersistenceError> {
    debug!(reservation_id, "Looking up reservation");

    let row: Option<(ReservationRow, String)> = reservations::table
        .inner_join(rooms::table)
        .filter(reservations::reservation_id.eq(reservation_id))
        .select((ReservationRow::as_select(), rooms::room_name))
        .first(conn)
        .optional()?;

    row.map(|(row, room_name)| to_reservation_data(row, room_name))
        .transpose()
}
