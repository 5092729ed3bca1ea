// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Bookings reservation system.
//!
//! Handlers validate boundary input, enforce roles, call the engine and the
//! persistence layer, and translate every lower-level error into `ApiError`.
//! They are transport-agnostic: the server crate owns HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod notify;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_store_error,
};
pub use handlers::{
    CALENDAR_PATH, bootstrap_admin, check_room_availability, create_reservation, create_room,
    create_user, delete_reservation, get_reservation, list_reservations, list_rooms, login, logout,
    process_reservation, render_calendar, resolve_calendar_month, search_availability,
    submit_calendar, update_reservation, whoami,
};
pub use notify::{MailError, MailMessage, Mailer, TracingMailer};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AvailabilityQuery, AvailabilityResponse, CalendarDayInfo, CalendarQuery, CalendarResponse,
    CalendarSubmitResponse, CreateReservationRequest, CreateReservationResponse, CreateRoomRequest,
    CreateRoomResponse, CreateUserRequest, CreateUserResponse, ListReservationsResponse,
    ListRoomsResponse, LoginRequest, LoginResponse, MonthRef, ReservationActionResponse,
    ReservationInfo, RoomAvailabilityResponse, RoomCalendarInfo, RoomInfo, UpdateReservationRequest,
    WhoAmIResponse,
};
