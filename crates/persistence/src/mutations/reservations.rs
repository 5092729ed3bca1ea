// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation mutations.
//!
//! A reservation is always stored together with exactly one `Reservation`
//! restriction covering the same stay. Creation and deletion touch both rows
//! in one transaction.

use bookings_domain::{GuestDetails, Reservation, RestrictionType, format_iso_date};
use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{reservations, room_restrictions};
use crate::error::PersistenceError;
use crate::mutations::restrictions::insert_restriction;
use crate::queries::restrictions::count_overlapping;
use crate::queries::rooms::room_exists;

/// Creates a reservation and its restriction.
///
/// The availability check is repeated inside the transaction, so two guests
/// racing for the same room cannot both succeed.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `reservation` - The reservation to store (its ID is ignored)
///
/// # Errors
///
/// - `PersistenceError::RoomNotFound` if the room does not exist
/// - `PersistenceError::Conflict` if the room is not free for the stay
/// - Any database error
pub fn create_reservation(
    conn: &mut SqliteConnection,
    reservation: &Reservation,
) -> Result<i64, PersistenceError> {
    let room_id: i64 = reservation.room_id;
    let stay = reservation.stay;

    conn.immediate_transaction(|conn| {
        if !room_exists(conn, room_id)? {
            return Err(PersistenceError::RoomNotFound(room_id));
        }
        if count_overlapping(conn, room_id, stay)? > 0 {
            return Err(PersistenceError::Conflict(format!(
                "room {room_id} is not available for {stay}"
            )));
        }

        diesel::insert_into(reservations::table)
            .values((
                reservations::first_name.eq(&reservation.guest.first_name),
                reservations::last_name.eq(&reservation.guest.last_name),
                reservations::email.eq(&reservation.guest.email),
                reservations::phone.eq(&reservation.guest.phone),
                reservations::room_id.eq(room_id),
                reservations::start_date.eq(format_iso_date(stay.start())),
                reservations::end_date.eq(format_iso_date(stay.end())),
            ))
            .execute(conn)?;
        let reservation_id: i64 = conn.inserted_row_id()?;

        let restriction_id: i64 = insert_restriction(
            conn,
            room_id,
            stay,
            RestrictionType::Reservation,
            Some(reservation_id),
        )?;

        info!(reservation_id, restriction_id, room_id, %stay, "Reservation created");
        Ok(reservation_id)
    })
}

/// Replaces the guest details of a reservation.
///
/// # Errors
///
/// - `PersistenceError::ReservationNotFound` if no row was updated
/// - Any database error
pub fn update_guest_details(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    guest: &GuestDetails,
) -> Result<(), PersistenceError> {
    debug!(reservation_id, "Updating guest details");

    let rows_affected: usize = diesel::update(reservations::table)
        .filter(reservations::reservation_id.eq(reservation_id))
        .set((
            reservations::first_name.eq(&guest.first_name),
            reservations::last_name.eq(&guest.last_name),
            reservations::email.eq(&guest.email),
            reservations::phone.eq(&guest.phone),
            reservations::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ReservationNotFound(reservation_id));
    }

    info!(reservation_id, "Guest details updated");
    Ok(())
}

/// Marks a reservation as processed.
///
/// Marking an already processed reservation is not an error.
///
/// # Errors
///
/// - `PersistenceError::ReservationNotFound` if no row was updated
/// - Any database error
pub fn mark_processed(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(reservations::table)
        .filter(reservations::reservation_id.eq(reservation_id))
        .set((
            reservations::processed.eq(1),
            reservations::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ReservationNotFound(reservation_id));
    }

    info!(reservation_id, "Reservation marked processed");
    Ok(())
}

/// Deletes a reservation and the restriction that holds its room.
///
/// # Errors
///
/// - `PersistenceError::ReservationNotFound` if the reservation does not exist
/// - Any database error
pub fn delete_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let restrictions_deleted: usize = diesel::delete(room_restrictions::table)
            .filter(room_restrictions::reservation_id.eq(reservation_id))
            .execute(conn)?;

        let rows_affected: usize = diesel::delete(reservations::table)
            .filter(reservations::reservation_id.eq(reservation_id))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::ReservationNotFound(reservation_id));
        }

        info!(reservation_id, restrictions_deleted, "Reservation deleted");
        Ok(())
    })
}
