// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates cross the boundary as `YYYY-MM-DD` strings and are parsed by the
//! handlers, so malformed input becomes an `InvalidInput` error rather than a
//! deserialization failure.

use bookings::Flash;

// ============================================================================
// Rooms & availability
// ============================================================================

/// A room as shown to guests and staff.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoomInfo {
    /// The room ID.
    pub room_id: i64,
    /// The display name.
    pub room_name: String,
}

/// API response listing rooms.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListRoomsResponse {
    /// All rooms, ordered by ID.
    pub rooms: Vec<RoomInfo>,
}

/// Query for an availability search. `end` is the checkout day.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AvailabilityQuery {
    /// Arrival date (`YYYY-MM-DD`).
    pub start: String,
    /// Departure date (`YYYY-MM-DD`), exclusive.
    pub end: String,
}

/// API response for an all-rooms availability search.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AvailabilityResponse {
    /// Arrival date.
    pub start: String,
    /// Departure date.
    pub end: String,
    /// Rooms free for the whole stay, ordered by ID. May be empty.
    pub rooms: Vec<RoomInfo>,
}

/// API response for a single-room availability check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoomAvailabilityResponse {
    /// The room ID.
    pub room_id: i64,
    /// Arrival date.
    pub start: String,
    /// Departure date.
    pub end: String,
    /// Whether the room is free for the whole stay.
    pub available: bool,
}

/// API request to create a room.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateRoomRequest {
    /// The display name.
    pub room_name: String,
}

/// API response for a successful room creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateRoomResponse {
    /// The new room ID.
    pub room_id: i64,
    /// The display name.
    pub room_name: String,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Reservations
// ============================================================================

/// API request to book a room.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateReservationRequest {
    /// The room to book.
    pub room_id: i64,
    /// Arrival date (`YYYY-MM-DD`).
    pub start_date: String,
    /// Departure date (`YYYY-MM-DD`), exclusive.
    pub end_date: String,
    /// Guest first name.
    pub first_name: String,
    /// Guest last name.
    pub last_name: String,
    /// Guest email.
    pub email: String,
    /// Guest phone (optional).
    #[serde(default)]
    pub phone: String,
}

/// API response for a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateReservationResponse {
    /// The new reservation ID.
    pub reservation_id: i64,
    /// The booked room.
    pub room_id: i64,
    /// The booked room's name.
    pub room_name: String,
    /// Arrival date.
    pub start_date: String,
    /// Departure date.
    pub end_date: String,
    /// A success message.
    pub message: String,
}

/// A reservation as shown to staff.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReservationInfo {
    /// The reservation ID.
    pub reservation_id: i64,
    /// The booked room.
    pub room_id: i64,
    /// The booked room's name.
    pub room_name: String,
    /// Arrival date.
    pub start_date: String,
    /// Departure date.
    pub end_date: String,
    /// Number of nights.
    pub nights: i64,
    /// Guest first name.
    pub first_name: String,
    /// Guest last name.
    pub last_name: String,
    /// Guest email.
    pub email: String,
    /// Guest phone.
    pub phone: String,
    /// Whether staff have processed the booking.
    pub processed: bool,
    /// When the booking was made.
    pub created_at: String,
    /// When the booking last changed.
    pub updated_at: String,
}

/// API response listing reservations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListReservationsResponse {
    /// The filter that was applied (`all` or `new`).
    pub filter: String,
    /// Matching reservations, newest stay first.
    pub reservations: Vec<ReservationInfo>,
}

/// API request to change a reservation's guest details.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateReservationRequest {
    /// Guest first name.
    pub first_name: String,
    /// Guest last name.
    pub last_name: String,
    /// Guest email.
    pub email: String,
    /// Guest phone (optional).
    #[serde(default)]
    pub phone: String,
}

/// Generic acknowledgement for reservation changes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReservationActionResponse {
    /// The affected reservation.
    pub reservation_id: i64,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Staff authentication
// ============================================================================

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    /// The staff email.
    pub email: String,
    /// The password.
    pub password: String,
}

/// API response for successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoginResponse {
    /// The session token (opaque), sent back as a bearer token.
    pub session_token: String,
    /// The staff email.
    pub email: String,
    /// The staff member's full name.
    pub display_name: String,
    /// The role.
    pub role: String,
    /// Session expiration timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub expires_at: String,
}

/// API response for the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    /// The user ID.
    pub user_id: i64,
    /// The staff email.
    pub email: String,
    /// The staff member's full name.
    pub display_name: String,
    /// The role.
    pub role: String,
    /// Last successful login, if any.
    pub last_login_at: Option<String>,
}

/// API request to create a staff account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateUserRequest {
    /// The login email.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// The role (`Admin` or `Staff`).
    pub role: String,
    /// The password.
    pub password: String,
    /// The password confirmation.
    pub password_confirmation: String,
}

/// API response for a successful staff account creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateUserResponse {
    /// The new user ID.
    pub user_id: i64,
    /// The normalized login email.
    pub email: String,
    /// The role.
    pub role: String,
}

// ============================================================================
// Block calendar
// ============================================================================

/// Query selecting a calendar month. Both absent means the current month.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CalendarQuery {
    /// The year.
    pub y: Option<i32>,
    /// The 1-based month.
    pub m: Option<u8>,
}

/// A year and month pair used for calendar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MonthRef {
    /// The year.
    pub year: i32,
    /// The 1-based month.
    pub month: u8,
}

/// One cell of the calendar.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CalendarDayInfo {
    /// The day (`YYYY-MM-DD`).
    pub date: String,
    /// `open`, `reserved` or `blocked`.
    pub state: String,
    /// The covering restriction, if any.
    pub restriction_id: Option<i64>,
    /// The covering reservation, for reserved days.
    pub reservation_id: Option<i64>,
}

/// One room row of the calendar.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoomCalendarInfo {
    /// The room ID.
    pub room_id: i64,
    /// The display name.
    pub room_name: String,
    /// Every day of the month, in order.
    pub days: Vec<CalendarDayInfo>,
}

/// API response for the block calendar of one month.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CalendarResponse {
    /// The rendered month.
    pub current: MonthRef,
    /// The month before.
    pub previous: MonthRef,
    /// The month after.
    pub next: MonthRef,
    /// Number of days in the month.
    pub days_in_month: u8,
    /// One row per room.
    pub rooms: Vec<RoomCalendarInfo>,
    /// The message left by the previous submission, if any.
    pub flash: Option<Flash>,
}

/// Result of a calendar submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CalendarSubmitResponse {
    /// The reconciled month.
    pub current: MonthRef,
    /// Where the browser goes next.
    pub redirect_to: String,
    /// Operations the store applied.
    pub applied: usize,
    /// Operations refused because state changed since the render.
    pub conflicts: usize,
    /// Operations that failed.
    pub failures: usize,
}
