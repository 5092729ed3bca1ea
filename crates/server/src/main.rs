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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use bookings::SessionState;
use bookings_api::{
    ApiError, AvailabilityQuery, AvailabilityResponse, CalendarQuery, CalendarResponse,
    CalendarSubmitResponse, CreateReservationRequest, CreateReservationResponse, CreateRoomRequest,
    CreateRoomResponse, CreateUserRequest, CreateUserResponse, ListReservationsResponse,
    ListRoomsResponse, LoginRequest, LoginResponse, Mailer, ReservationActionResponse,
    ReservationInfo, RoomAvailabilityResponse, TracingMailer, UpdateReservationRequest,
    WhoAmIResponse, bootstrap_admin, check_room_availability, create_reservation, create_room,
    create_user, delete_reservation, get_reservation, list_reservations, list_rooms, login, logout,
    process_reservation, render_calendar, resolve_calendar_month, search_availability,
    submit_calendar, update_reservation, whoami,
};
use bookings_domain::{CalendarMonth, Room};
use bookings_persistence::{Persistence, PersistenceError};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::{SessionStaff, load_session_state, save_session_state};

/// Bookings Server - HTTP server for the Bookings reservation system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How long a storage call may wait on a locked database, in milliseconds
    #[arg(long, default_value_t = 5000)]
    busy_timeout_ms: u32,

    /// How long a staff session stays valid, in hours
    #[arg(long, default_value_t = 24)]
    session_hours: u32,

    /// Sender of guest mail and recipient of booking notices
    #[arg(long, default_value = "owner@localhost")]
    owner_email: String,

    /// Email of the first admin, created only when no staff accounts exist
    #[arg(long, requires = "admin_password")]
    admin_email: Option<String>,

    /// Password of the first admin
    #[arg(long, requires = "admin_email")]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
///
/// The single database connection sits behind a Mutex; every handler locks
/// it, runs its work to completion and releases it.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Outgoing mail.
    mailer: Arc<dyn Mailer>,
    /// Sender of guest mail and recipient of booking notices.
    owner_email: String,
    /// Lifetime of new staff sessions.
    session_duration: Duration,
}

/// Query parameters for listing reservations.
#[derive(Debug, Deserialize)]
struct ReservationFilterQuery {
    /// `all` or `new`.
    filter: Option<String>,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageResponse {
    /// A success message.
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

// ============================================================================
// Public handlers
// ============================================================================

/// Handler for GET `/rooms` endpoint.
async fn handle_list_rooms(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListRoomsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRoomsResponse = list_rooms(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/availability` endpoint.
///
/// Lists every room free for the requested stay.
async fn handle_search_availability(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AvailabilityResponse = search_availability(&mut *persistence, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/rooms/{room_id}/availability` endpoint.
async fn handle_room_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(room_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<RoomAvailabilityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RoomAvailabilityResponse =
        check_room_availability(&mut persistence, room_id, &query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reservations` endpoint.
///
/// Books a room and notifies the guest and the owner.
async fn handle_create_reservation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<Json<CreateReservationResponse>, HttpError> {
    info!(
        room_id = req.room_id,
        start = %req.start_date,
        end = %req.end_date,
        "Handling create_reservation request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateReservationResponse = create_reservation(
        &mut persistence,
        app_state.mailer.as_ref(),
        &app_state.owner_email,
        &req,
    )?;
    drop(persistence);

    info!(
        reservation_id = response.reservation_id,
        "Successfully created reservation"
    );
    Ok(Json(response))
}

/// Handler for POST `/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req, app_state.session_duration)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Staff handlers
// ============================================================================

/// Handler for POST `/logout` endpoint.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(actor, _user, session): SessionStaff,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &session.session_token)?;
    drop(persistence);

    info!(user_id = actor.user_id, "Staff member logged out");
    Ok(Json(MessageResponse {
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/whoami` endpoint.
#[allow(clippy::unused_async)]
async fn handle_whoami(SessionStaff(_actor, user, _session): SessionStaff) -> Json<WhoAmIResponse> {
    Json(whoami(&user))
}

/// Handler for POST `/admin/rooms` endpoint.
async fn handle_create_room(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(actor, _user, _session): SessionStaff,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateRoomResponse = create_room(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/admin/users` endpoint.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(actor, _user, _session): SessionStaff,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CreateUserResponse = create_user(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/admin/reservations` endpoint.
async fn handle_list_reservations(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(_actor, _user, _session): SessionStaff,
    Query(query): Query<ReservationFilterQuery>,
) -> Result<Json<ListReservationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListReservationsResponse =
        list_reservations(&mut persistence, query.filter.as_deref())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/admin/reservations/{id}` endpoint.
async fn handle_get_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(_actor, _user, _session): SessionStaff,
    Path(reservation_id): Path<i64>,
) -> Result<Json<ReservationInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ReservationInfo = get_reservation(&mut persistence, reservation_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/admin/reservations/{id}` endpoint.
async fn handle_update_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(actor, _user, _session): SessionStaff,
    Path(reservation_id): Path<i64>,
    Json(req): Json<UpdateReservationRequest>,
) -> Result<Json<ReservationActionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ReservationActionResponse =
        update_reservation(&mut persistence, reservation_id, &req)?;
    drop(persistence);

    info!(reservation_id, user_id = actor.user_id, "Updated reservation");
    Ok(Json(response))
}

/// Handler for POST `/admin/reservations/{id}/process` endpoint.
async fn handle_process_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(actor, _user, _session): SessionStaff,
    Path(reservation_id): Path<i64>,
) -> Result<Json<ReservationActionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ReservationActionResponse =
        process_reservation(&mut persistence, reservation_id)?;
    drop(persistence);

    info!(reservation_id, user_id = actor.user_id, "Processed reservation");
    Ok(Json(response))
}

/// Handler for DELETE `/admin/reservations/{id}` endpoint.
async fn handle_delete_reservation(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(actor, _user, _session): SessionStaff,
    Path(reservation_id): Path<i64>,
) -> Result<Json<ReservationActionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ReservationActionResponse = delete_reservation(&mut persistence, reservation_id)?;
    drop(persistence);

    info!(reservation_id, user_id = actor.user_id, "Deleted reservation");
    Ok(Json(response))
}

// ============================================================================
// Block calendar
// ============================================================================

/// Handler for GET `/admin/reservations-calendar` endpoint.
///
/// Renders one month and stages the block snapshots in the caller's session.
async fn handle_get_calendar(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(_actor, _user, session): SessionStaff,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, HttpError> {
    let month: CalendarMonth = resolve_calendar_month(&query, OffsetDateTime::now_utc().date())?;

    let mut persistence = app_state.persistence.lock().await;
    let rooms: Vec<Room> = persistence.list_rooms()?;
    let mut state: SessionState = load_session_state(&mut persistence, &session)?;
    let response: CalendarResponse = render_calendar(&mut *persistence, &rooms, &mut state, month)?;
    save_session_state(&mut persistence, &session, &state)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/admin/reservations-calendar` endpoint.
///
/// Applies the submitted form and redirects back to the month with 303.
///
/// Once the form has been applied the redirect is always returned. A failure
/// to save the outcome flash is logged, since the store writes stand.
async fn handle_submit_calendar(
    AxumState(app_state): AxumState<AppState>,
    SessionStaff(actor, _user, session): SessionStaff,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let rooms: Vec<Room> = persistence.list_rooms()?;
    let mut state: SessionState = load_session_state(&mut persistence, &session)?;
    let response: CalendarSubmitResponse =
        submit_calendar(&mut *persistence, &rooms, &mut state, &fields)?;
    if let Err(e) = save_session_state(&mut persistence, &session, &state) {
        warn!(
            user_id = actor.user_id,
            session_id = session.session_id,
            error = %e,
            "Failed to save calendar outcome to session"
        );
    }
    drop(persistence);

    info!(
        user_id = actor.user_id,
        year = response.current.year,
        month = response.current.month,
        applied = response.applied,
        conflicts = response.conflicts,
        failures = response.failures,
        "Block calendar submitted"
    );
    Ok(Redirect::to(&response.redirect_to))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/rooms", get(handle_list_rooms))
        .route("/availability", get(handle_search_availability))
        .route(
            "/rooms/{room_id}/availability",
            get(handle_room_availability),
        )
        .route("/reservations", post(handle_create_reservation))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/whoami", get(handle_whoami))
        .route("/admin/rooms", post(handle_create_room))
        .route("/admin/users", post(handle_create_user))
        .route("/admin/reservations", get(handle_list_reservations))
        .route(
            "/admin/reservations/{id}",
            get(handle_get_reservation)
                .post(handle_update_reservation)
                .delete(handle_delete_reservation),
        )
        .route(
            "/admin/reservations/{id}/process",
            post(handle_process_reservation),
        )
        .route(
            bookings_api::CALENDAR_PATH,
            get(handle_get_calendar).post(handle_submit_calendar),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Bookings Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    persistence.set_busy_timeout(args.busy_timeout_ms)?;

    let expired: usize = persistence.delete_expired_sessions()?;
    if expired > 0 {
        info!(expired, "Removed expired sessions");
    }

    if let (Some(email), Some(password)) = (&args.admin_email, &args.admin_password)
        && let Some(user_id) = bootstrap_admin(&mut persistence, email, password)?
    {
        info!(user_id, email = %email, "Created first admin account");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        mailer: Arc::new(TracingMailer),
        owner_email: args.owner_email,
        session_duration: Duration::hours(i64::from(args.session_hours)),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode, header},
    };
    use bookings_domain::StayRange;
    use tower::ServiceExt;

    const ADMIN_EMAIL: &str = "admin@bookings.test";
    const STAFF_EMAIL: &str = "staff@bookings.test";
    const PASSWORD: &str = "Harbor-Light-42";

    /// Helper to create test app state with two rooms and two staff accounts.
    fn create_test_app_state() -> AppState {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        persistence.create_room("General's Quarters").unwrap();
        persistence.create_room("Major's Suite").unwrap();
        persistence
            .create_user(ADMIN_EMAIL, "Ada", "Admin", PASSWORD, "Admin")
            .unwrap();
        persistence
            .create_user(STAFF_EMAIL, "Sam", "Staff", PASSWORD, "Staff")
            .unwrap();

        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            mailer: Arc::new(TracingMailer),
            owner_email: String::from("owner@bookings.test"),
            session_duration: Duration::hours(1),
        }
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: String) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn form_request(token: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(bookings_api::CALENDAR_PATH)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    async fn login_as(app: &Router, email: &str) -> String {
        let body = serde_json::to_string(&LoginRequest {
            email: email.to_string(),
            password: String::from(PASSWORD),
        })
        .unwrap();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/login", None, body))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let login: LoginResponse = read_json(response).await;
        login.session_token
    }

    fn booking_body(room_id: i64, start: &str, end: &str) -> String {
        serde_json::to_string(&CreateReservationRequest {
            room_id,
            start_date: start.to_string(),
            end_date: end.to_string(),
            first_name: String::from("Alice"),
            last_name: String::from("Walker"),
            email: String::from("alice@example.com"),
            phone: String::new(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_rooms() {
        let app: Router = build_router(create_test_app_state());

        let response = app.oneshot(get_request("/rooms", None)).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let rooms: ListRoomsResponse = read_json(response).await;
        assert_eq!(rooms.rooms.len(), 2);
    }

    #[tokio::test]
    async fn test_booking_then_availability() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/reservations",
                None,
                booking_body(1, "2025-06-10", "2025-06-12"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request(
                "/availability?start=2025-06-11&end=2025-06-12",
                None,
            ))
            .await
            .unwrap();
        let availability: AvailabilityResponse = read_json(response).await;
        assert_eq!(availability.rooms.len(), 1);
        assert_eq!(availability.rooms[0].room_id, 2);

        let response = app
            .clone()
            .oneshot(get_request(
                "/rooms/1/availability?start=2025-06-12&end=2025-06-14",
                None,
            ))
            .await
            .unwrap();
        let check: RoomAvailabilityResponse = read_json(response).await;
        assert!(check.available);

        let response = app
            .oneshot(json_request(
                "POST",
                "/reservations",
                None,
                booking_body(1, "2025-06-11", "2025-06-13"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_bad_stay_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(get_request(
                "/availability?start=2025-06-12&end=2025-06-10",
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_room_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/reservations",
                None,
                booking_body(9, "2025-06-10", "2025-06-12"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_staff_routes_require_session() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(get_request("/whoami", None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(get_request("/admin/reservations", Some("not-a-token")))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_whoami_logout() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login_as(&app, STAFF_EMAIL).await;

        let response = app
            .clone()
            .oneshot(get_request("/whoami", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let me: WhoAmIResponse = read_json(response).await;
        assert_eq!(me.email, STAFF_EMAIL);
        assert_eq!(me.role, "Staff");

        let response = app
            .clone()
            .oneshot(json_request("POST", "/logout", Some(&token), String::new()))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(get_request("/whoami", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_staff_cannot_create_room() {
        let app: Router = build_router(create_test_app_state());
        let staff: String = login_as(&app, STAFF_EMAIL).await;
        let admin: String = login_as(&app, ADMIN_EMAIL).await;
        let body = String::from(r#"{"room_name":"Colonel's Loft"}"#);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/admin/rooms", Some(&staff), body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let response = app
            .oneshot(json_request("POST", "/admin/rooms", Some(&admin), body))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let created: CreateRoomResponse = read_json(response).await;
        assert_eq!(created.room_id, 3);
    }

    #[tokio::test]
    async fn test_reservation_admin_round() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login_as(&app, STAFF_EMAIL).await;
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/reservations",
                None,
                booking_body(2, "2025-07-01", "2025-07-04"),
            ))
            .await
            .unwrap();
        let created: CreateReservationResponse = read_json(response).await;
        let uri: String = format!("/admin/reservations/{}", created.reservation_id);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("{uri}/process"),
                Some(&token),
                String::new(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request("/admin/reservations?filter=new", Some(&token)))
            .await
            .unwrap();
        let listed: ListReservationsResponse = read_json(response).await;
        assert!(listed.reservations.is_empty());

        let response = app
            .clone()
            .oneshot(json_request("DELETE", &uri, Some(&token), String::new()))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app.oneshot(get_request(&uri, Some(&token))).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_calendar_render_stages_session_values() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let token: String = login_as(&app, STAFF_EMAIL).await;

        let response = app
            .oneshot(get_request(
                "/admin/reservations-calendar?y=2025&m=6",
                Some(&token),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let calendar: CalendarResponse = read_json(response).await;
        assert_eq!(calendar.days_in_month, 30);
        assert_eq!(calendar.rooms.len(), 2);

        let mut persistence = app_state.persistence.lock().await;
        let session = persistence.get_session_by_token(&token).unwrap().unwrap();
        let values = persistence.load_session_values(session.session_id).unwrap();
        assert!(values.contains_key(&bookings::block_map_key(1)));
        assert!(values.contains_key(&bookings::block_map_key(2)));
    }

    #[tokio::test]
    async fn test_calendar_submit_redirects_when_session_save_fails() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let token: String = login_as(&app, ADMIN_EMAIL).await;
        let (actor, user, session) = {
            let mut persistence = app_state.persistence.lock().await;
            let validated =
                bookings_api::AuthenticationService::validate_session(&mut persistence, &token)
                    .unwrap();
            // values of a deleted session violate the foreign key on save
            persistence.delete_session(&token).unwrap();
            validated
        };
        let fields: Vec<(String, String)> = vec![
            (String::from("y"), String::from("2025")),
            (String::from("m"), String::from("6")),
            (String::from("add_block_1_2025-06-10"), String::from("1")),
        ];

        let redirect: Redirect = handle_submit_calendar(
            AxumState(app_state.clone()),
            SessionStaff(actor, user, session),
            Form(fields),
        )
        .await
        .unwrap();

        let response: Response = redirect.into_response();
        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/reservations-calendar?y=2025&m=06"
        );
        let mut persistence = app_state.persistence.lock().await;
        let blocked = persistence
            .restrictions_overlapping(1, StayRange::parse("2025-06-10", "2025-06-11").unwrap())
            .unwrap();
        assert_eq!(blocked.len(), 1);
    }

    #[tokio::test]
    async fn test_calendar_submit_redirects_with_see_other() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login_as(&app, STAFF_EMAIL).await;
        app.clone()
            .oneshot(get_request(
                "/admin/reservations-calendar?y=2025&m=6",
                Some(&token),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(form_request(&token, "y=2025&m=6&add_block_1_2025-06-10=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/admin/reservations-calendar?y=2025&m=06"
        );

        let response = app
            .clone()
            .oneshot(get_request(
                "/rooms/1/availability?start=2025-06-10&end=2025-06-11",
                None,
            ))
            .await
            .unwrap();
        let check: RoomAvailabilityResponse = read_json(response).await;
        assert!(!check.available);

        let response = app
            .oneshot(get_request(
                "/admin/reservations-calendar?y=2025&m=6",
                Some(&token),
            ))
            .await
            .unwrap();
        let calendar: CalendarResponse = read_json(response).await;
        assert_eq!(calendar.rooms[0].days[9].state, "blocked");
        assert!(calendar.flash.is_some());
    }

    #[tokio::test]
    async fn test_calendar_submit_rejects_malformed_form() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login_as(&app, STAFF_EMAIL).await;

        let response = app
            .oneshot(form_request(&token, "y=2025&m=6&add_block_one_2025-06-10=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_api_error_status_mapping() {
        let cases: [(ApiError, HttpStatusCode); 4] = [
            (
                ApiError::Internal {
                    message: String::from("store down"),
                },
                HttpStatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Conflict {
                    message: String::from("taken"),
                },
                HttpStatusCode::CONFLICT,
            ),
            (
                ApiError::ResourceNotFound {
                    resource_type: String::from("Room"),
                    message: String::from("missing"),
                },
                HttpStatusCode::NOT_FOUND,
            ),
            (
                ApiError::DomainRuleViolation {
                    rule: String::from("unique_email"),
                    message: String::from("exists"),
                },
                HttpStatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(HttpError::from(err).status, status);
        }
    }
}
