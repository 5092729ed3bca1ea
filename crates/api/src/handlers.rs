// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use bookings::{
    CalendarSubmission, Flash, MonthCalendar, ReconciliationReport, RestrictionStore, SessionState,
    available_rooms, build_month_calendar, is_room_available, reconcile_calendar, stage_snapshots,
};
use bookings_domain::{
    CalendarMonth, DayState, GuestDetails, Reservation, Room, StayRange, format_iso_date,
    validate_email, validate_guest_details, validate_room_name,
};
use bookings_persistence::{Persistence, ReservationData, UserData};
use time::{Date, Duration};
use tracing::{error, info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_store_error,
};
use crate::notify::{MailMessage, Mailer};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AvailabilityQuery, AvailabilityResponse, CalendarDayInfo, CalendarQuery, CalendarResponse,
    CalendarSubmitResponse, CreateReservationRequest, CreateReservationResponse, CreateRoomRequest,
    CreateRoomResponse, CreateUserRequest, CreateUserResponse, ListReservationsResponse,
    ListRoomsResponse, LoginRequest, LoginResponse, MonthRef, ReservationActionResponse,
    ReservationInfo, RoomAvailabilityResponse, RoomCalendarInfo, RoomInfo, UpdateReservationRequest,
    WhoAmIResponse,
};

/// Path of the block calendar, used for post-submit redirects.
pub const CALENDAR_PATH: &str = "/admin/reservations-calendar";

fn room_info(room: Room) -> RoomInfo {
    RoomInfo {
        room_id: room.room_id,
        room_name: room.room_name,
    }
}

fn parse_stay(start: &str, end: &str) -> Result<StayRange, ApiError> {
    StayRange::parse(start, end).map_err(translate_domain_error)
}

fn guest_details(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
) -> Result<GuestDetails, ApiError> {
    let guest: GuestDetails = GuestDetails::new(first_name, last_name, email, phone);
    validate_guest_details(&guest).map_err(translate_domain_error)?;
    Ok(guest)
}

fn reservation_info(data: ReservationData) -> Result<ReservationInfo, ApiError> {
    let reservation: Reservation = data.reservation;
    let reservation_id: i64 = reservation.reservation_id.ok_or_else(|| ApiError::Internal {
        message: String::from("Stored reservation has no ID"),
    })?;

    Ok(ReservationInfo {
        reservation_id,
        room_id: reservation.room_id,
        room_name: data.room_name,
        start_date: format_iso_date(reservation.stay.start()),
        end_date: format_iso_date(reservation.stay.end()),
        nights: reservation.stay.nights(),
        first_name: reservation.guest.first_name,
        last_name: reservation.guest.last_name,
        email: reservation.guest.email,
        phone: reservation.guest.phone,
        processed: reservation.processed,
        created_at: data.created_at,
        updated_at: data.updated_at,
    })
}

fn load_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<ReservationData, ApiError> {
    persistence
        .get_reservation(reservation_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Reservation"),
            message: format!("Reservation {reservation_id} does not exist"),
        })
}

// ============================================================================
// Rooms & availability
// ============================================================================

/// Lists all rooms.
///
/// # Errors
///
/// Returns an error if the rooms cannot be read.
pub fn list_rooms(persistence: &mut Persistence) -> Result<ListRoomsResponse, ApiError> {
    let rooms: Vec<Room> = persistence
        .list_rooms()
        .map_err(translate_persistence_error)?;

    Ok(ListRoomsResponse {
        rooms: rooms.into_iter().map(room_info).collect(),
    })
}

/// Finds every room free for the requested stay.
///
/// # Errors
///
/// Returns `InvalidInput` for malformed dates or `start >= end`, and
/// `Internal` if the store fails. A store failure never reads as "no rooms".
pub fn search_availability<S: RestrictionStore + ?Sized>(
    store: &mut S,
    query: &AvailabilityQuery,
) -> Result<AvailabilityResponse, ApiError> {
    let stay: StayRange = parse_stay(&query.start, &query.end)?;
    let rooms: Vec<Room> = available_rooms(store, stay).map_err(|e| {
        error!(%stay, error = %e, "Availability search failed");
        translate_store_error(e)
    })?;

    Ok(AvailabilityResponse {
        start: format_iso_date(stay.start()),
        end: format_iso_date(stay.end()),
        rooms: rooms.into_iter().map(room_info).collect(),
    })
}

/// Checks whether one room is free for the requested stay.
///
/// # Errors
///
/// Returns `InvalidInput` for malformed dates, `ResourceNotFound` for an
/// unknown room, and `Internal` if the store fails.
pub fn check_room_availability(
    persistence: &mut Persistence,
    room_id: i64,
    query: &AvailabilityQuery,
) -> Result<RoomAvailabilityResponse, ApiError> {
    let stay: StayRange = parse_stay(&query.start, &query.end)?;

    if persistence
        .get_room(room_id)
        .map_err(translate_persistence_error)?
        .is_none()
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Room"),
            message: format!("Room {room_id} does not exist"),
        });
    }

    let available: bool =
        is_room_available(persistence, room_id, stay).map_err(translate_store_error)?;

    Ok(RoomAvailabilityResponse {
        room_id,
        start: format_iso_date(stay.start()),
        end: format_iso_date(stay.end()),
        available,
    })
}

/// Creates a room.
///
/// Only Admin actors may create rooms.
///
/// # Errors
///
/// Returns an error if unauthorized, the name is invalid, or the insert fails.
pub fn create_room(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateRoomRequest,
) -> Result<CreateRoomResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "create_room")?;
    validate_room_name(&request.room_name).map_err(translate_domain_error)?;

    let room: Room = persistence
        .create_room(&request.room_name)
        .map_err(translate_persistence_error)?;

    info!(room_id = room.room_id, user_id = actor.user_id, "Room created via API");
    Ok(CreateRoomResponse {
        room_id: room.room_id,
        message: format!("Created room '{}'", room.room_name),
        room_name: room.room_name,
    })
}

// ============================================================================
// Reservations
// ============================================================================

/// Books a room for a guest.
///
/// On success a confirmation goes to the guest and a notice to the owner.
/// Mail failures are logged and do not undo the booking.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `mailer` - Outgoing mail
/// * `owner_email` - Sender of guest mail and recipient of owner notices
/// * `request` - The booking request
///
/// # Errors
///
/// Returns an error if:
/// - The dates or guest details are invalid
/// - The room does not exist
/// - The room is not free for the stay
/// - Database operations fail
pub fn create_reservation(
    persistence: &mut Persistence,
    mailer: &dyn Mailer,
    owner_email: &str,
    request: &CreateReservationRequest,
) -> Result<CreateReservationResponse, ApiError> {
    let stay: StayRange = parse_stay(&request.start_date, &request.end_date)?;
    let guest: GuestDetails = guest_details(
        &request.first_name,
        &request.last_name,
        &request.email,
        &request.phone,
    )?;

    let room: Room = persistence
        .get_room(request.room_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Room"),
            message: format!("Room {} does not exist", request.room_id),
        })?;

    if !is_room_available(persistence, room.room_id, stay).map_err(translate_store_error)? {
        return Err(ApiError::Conflict {
            message: format!("{} is not available for {stay}", room.room_name),
        });
    }

    let reservation: Reservation = Reservation::new(room.room_id, stay, guest);
    let reservation_id: i64 = persistence
        .create_reservation(&reservation)
        .map_err(translate_persistence_error)?;

    send_reservation_mail(mailer, owner_email, &room, &reservation);

    Ok(CreateReservationResponse {
        reservation_id,
        room_id: room.room_id,
        start_date: format_iso_date(stay.start()),
        end_date: format_iso_date(stay.end()),
        message: format!("Reserved {} for {} night(s)", room.room_name, stay.nights()),
        room_name: room.room_name,
    })
}

fn send_reservation_mail(
    mailer: &dyn Mailer,
    owner_email: &str,
    room: &Room,
    reservation: &Reservation,
) {
    let arrival: String = format_iso_date(reservation.stay.start());
    let departure: String = format_iso_date(reservation.stay.end());

    let messages: [MailMessage; 2] = [
        MailMessage {
            from: owner_email.to_string(),
            to: reservation.guest.email.clone(),
            subject: String::from("Reservation Confirmation"),
            body: format!(
                "Dear {},\n\nThis is to confirm your reservation of {} from {arrival} to {departure}.",
                reservation.guest.first_name, room.room_name
            ),
        },
        MailMessage {
            from: owner_email.to_string(),
            to: owner_email.to_string(),
            subject: String::from("Reservation Notification"),
            body: format!(
                "A reservation has been made for {} from {arrival} to {departure} by {}.",
                room.room_name,
                reservation.guest.full_name()
            ),
        },
    ];

    for message in &messages {
        if let Err(e) = mailer.send(message) {
            warn!(error = %e, "Reservation mail was not sent");
        }
    }
}

/// Lists reservations.
///
/// # Arguments
///
/// * `filter` - `all` (default) or `new` for unprocessed reservations only
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown filter, or an error if the query fails.
pub fn list_reservations(
    persistence: &mut Persistence,
    filter: Option<&str>,
) -> Result<ListReservationsResponse, ApiError> {
    let filter: &str = filter.unwrap_or("all");
    let unprocessed_only: bool = match filter {
        "all" => false,
        "new" => true,
        other => {
            return Err(ApiError::InvalidInput {
                field: String::from("filter"),
                message: format!("Unknown filter '{other}'. Must be 'all' or 'new'"),
            });
        }
    };

    let reservations: Vec<ReservationInfo> = persistence
        .list_reservations(unprocessed_only)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(reservation_info)
        .collect::<Result<_, _>>()?;

    Ok(ListReservationsResponse {
        filter: filter.to_string(),
        reservations,
    })
}

/// Shows one reservation.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the reservation does not exist.
pub fn get_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<ReservationInfo, ApiError> {
    reservation_info(load_reservation(persistence, reservation_id)?)
}

/// Replaces a reservation's guest details.
///
/// # Errors
///
/// Returns an error if the details are invalid or the reservation does not exist.
pub fn update_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
    request: &UpdateReservationRequest,
) -> Result<ReservationActionResponse, ApiError> {
    let guest: GuestDetails = guest_details(
        &request.first_name,
        &request.last_name,
        &request.email,
        &request.phone,
    )?;

    persistence
        .update_guest_details(reservation_id, &guest)
        .map_err(translate_persistence_error)?;

    Ok(ReservationActionResponse {
        reservation_id,
        message: String::from("Reservation updated"),
    })
}

/// Marks a reservation as processed.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the reservation does not exist.
pub fn process_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<ReservationActionResponse, ApiError> {
    persistence
        .mark_reservation_processed(reservation_id)
        .map_err(translate_persistence_error)?;

    Ok(ReservationActionResponse {
        reservation_id,
        message: String::from("Reservation marked as processed"),
    })
}

/// Deletes a reservation and frees its room.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the reservation does not exist.
pub fn delete_reservation(
    persistence: &mut Persistence,
    reservation_id: i64,
) -> Result<ReservationActionResponse, ApiError> {
    persistence
        .delete_reservation(reservation_id)
        .map_err(translate_persistence_error)?;

    Ok(ReservationActionResponse {
        reservation_id,
        message: String::from("Reservation deleted"),
    })
}

// ============================================================================
// Staff authentication
// ============================================================================

/// Authenticates a staff member and creates a session.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for bad credentials or disabled accounts.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_duration: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor, user): (String, AuthenticatedActor, UserData) =
        AuthenticationService::login(
            persistence,
            &request.email,
            &request.password,
            session_duration,
        )?;

    let expires_at: String = persistence
        .get_session_by_token(&session_token)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?
        .expires_at;

    Ok(LoginResponse {
        session_token,
        email: user.email,
        display_name: format!("{} {}", user.first_name, user.last_name),
        role: String::from(actor.role.as_str()),
        expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the current staff member's information.
#[must_use]
pub fn whoami(user: &UserData) -> WhoAmIResponse {
    WhoAmIResponse {
        user_id: user.user_id,
        email: user.email.clone(),
        display_name: format!("{} {}", user.first_name, user.last_name),
        role: user.role.clone(),
        last_login_at: user.last_login_at.clone(),
    }
}

/// Creates a staff account.
///
/// Only Admin actors may create accounts.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The role, email or password is invalid
/// - The email already exists
/// - Database operations fail
pub fn create_user(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateUserRequest,
) -> Result<CreateUserResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "create_user")?;

    let role: Role = request.role.parse().map_err(|_| ApiError::InvalidInput {
        field: String::from("role"),
        message: format!("Invalid role: {}. Must be 'Admin' or 'Staff'", request.role),
    })?;
    let email: String = request.email.trim().to_lowercase();
    validate_email(&email).map_err(translate_domain_error)?;
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("First and last name are required"),
        });
    }

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &email,
        &request.first_name,
    )?;

    let user_id: i64 = persistence
        .create_user(
            &email,
            request.first_name.trim(),
            request.last_name.trim(),
            &request.password,
            role.as_str(),
        )
        .map_err(translate_persistence_error)?;

    info!(user_id, created_by = actor.user_id, "Staff account created");
    Ok(CreateUserResponse {
        user_id,
        email,
        role: String::from(role.as_str()),
    })
}

/// Creates the first Admin account when no accounts exist yet.
///
/// Returns the new user ID, or `None` if accounts already exist.
///
/// # Errors
///
/// Returns an error if the email or password is invalid or the insert fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    email: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    if persistence
        .count_users()
        .map_err(translate_persistence_error)?
        > 0
    {
        return Ok(None);
    }

    let email: String = email.trim().to_lowercase();
    validate_email(&email).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(password, password, &email, "")?;

    let user_id: i64 = persistence
        .create_user(
            &email,
            "Site",
            "Administrator",
            password,
            Role::Admin.as_str(),
        )
        .map_err(translate_persistence_error)?;

    info!(user_id, "Bootstrapped first admin account");
    Ok(Some(user_id))
}

// ============================================================================
// Block calendar
// ============================================================================

fn month_ref(month: CalendarMonth) -> MonthRef {
    MonthRef {
        year: month.year(),
        month: month.month_number(),
    }
}

/// Picks the calendar month from the query, defaulting to the month of `today`.
///
/// # Errors
///
/// Returns `InvalidInput` if only one of `y`/`m` is given or the month is invalid.
pub fn resolve_calendar_month(
    query: &CalendarQuery,
    today: Date,
) -> Result<CalendarMonth, ApiError> {
    match (query.y, query.m) {
        (None, None) => CalendarMonth::containing(today).map_err(translate_domain_error),
        (Some(year), Some(month)) => {
            CalendarMonth::new(year, month).map_err(translate_domain_error)
        }
        _ => Err(ApiError::InvalidInput {
            field: String::from("y"),
            message: String::from("Year and month must be given together"),
        }),
    }
}

fn calendar_day(date: Date, state: DayState) -> CalendarDayInfo {
    let (restriction_id, reservation_id): (Option<i64>, Option<i64>) = match state {
        DayState::Open => (None, None),
        DayState::Reserved {
            restriction_id,
            reservation_id,
        } => (Some(restriction_id), reservation_id),
        DayState::Blocked { restriction_id } => (Some(restriction_id), None),
    };

    CalendarDayInfo {
        date: format_iso_date(date),
        state: String::from(state.as_str()),
        restriction_id,
        reservation_id,
    }
}

/// Renders the block calendar for `month` and stages the block snapshots
/// that the next submission is reconciled against.
///
/// Any flash left by the previous submission is consumed.
///
/// # Errors
///
/// Returns `Internal` if the store fails. The session is left untouched in
/// that case.
pub fn render_calendar<S: RestrictionStore + ?Sized>(
    store: &mut S,
    rooms: &[Room],
    session: &mut SessionState,
    month: CalendarMonth,
) -> Result<CalendarResponse, ApiError> {
    let calendar: MonthCalendar = build_month_calendar(store, rooms, month).map_err(|e| {
        error!(%month, error = %e, "Failed to build block calendar");
        ApiError::Internal {
            message: format!("Failed to build calendar for {month}: {e}"),
        }
    })?;

    stage_snapshots(session, &calendar).map_err(translate_core_error)?;
    let flash: Option<Flash> = session.take_flash();

    let previous: CalendarMonth = month.previous().map_err(translate_domain_error)?;
    let next: CalendarMonth = month.next().map_err(translate_domain_error)?;

    let room_rows: Vec<RoomCalendarInfo> = calendar
        .rooms
        .into_iter()
        .map(|row| RoomCalendarInfo {
            room_id: row.room.room_id,
            room_name: row.room.room_name,
            days: row
                .days
                .into_iter()
                .map(|(date, state)| calendar_day(date, state))
                .collect(),
        })
        .collect();

    Ok(CalendarResponse {
        current: month_ref(month),
        previous: month_ref(previous),
        next: month_ref(next),
        days_in_month: month.days_in_month(),
        rooms: room_rows,
        flash,
    })
}

fn form_field<T: std::str::FromStr>(
    fields: &[(String, String)],
    name: &str,
) -> Result<T, ApiError> {
    let value: &str = fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| ApiError::InvalidInput {
            field: name.to_string(),
            message: String::from("Field is required"),
        })?;

    value.trim().parse().map_err(|_| ApiError::InvalidInput {
        field: name.to_string(),
        message: format!("'{value}' is not a valid number"),
    })
}

/// Applies a submitted block calendar form.
///
/// The month comes from the `y` and `m` fields. Block changes are reconciled
/// against the snapshots staged by the last render; per-change problems are
/// reported through the flash and the counts, never as an error.
///
/// # Errors
///
/// Returns `InvalidInput` if the form cannot be decoded. Nothing is written
/// in that case.
pub fn submit_calendar<S: RestrictionStore + ?Sized>(
    store: &mut S,
    rooms: &[Room],
    session: &mut SessionState,
    fields: &[(String, String)],
) -> Result<CalendarSubmitResponse, ApiError> {
    let year: i32 = form_field(fields, "y")?;
    let month_number: u8 = form_field(fields, "m")?;
    let month: CalendarMonth =
        CalendarMonth::new(year, month_number).map_err(translate_domain_error)?;

    let submission: CalendarSubmission =
        CalendarSubmission::from_form(month, fields).map_err(translate_core_error)?;

    let room_ids: Vec<i64> = rooms.iter().map(|room| room.room_id).collect();
    let report: ReconciliationReport = reconcile_calendar(store, session, &room_ids, &submission);

    session
        .put_flash(&report.flash())
        .map_err(translate_core_error)?;

    Ok(CalendarSubmitResponse {
        current: month_ref(month),
        redirect_to: format!(
            "{CALENDAR_PATH}?y={:04}&m={:02}",
            month.year(),
            month.month_number()
        ),
        applied: report.applied(),
        conflicts: report.conflicts(),
        failures: report.failures(),
    })
}
