// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and session-value storage for the server.
//!
//! This module provides the Axum extractor that validates bearer tokens, and
//! the load/save pair that moves a session's key/value map between the
//! database and a `SessionState` around a handler.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use bookings::SessionState;
use bookings_api::{AuthenticatedActor, AuthenticationService};
use bookings_persistence::{Persistence, PersistenceError, SessionData, UserData};
use tracing::{debug, warn};

use crate::AppState;

/// Extractor for authenticated staff members.
///
/// This extractor validates the session token from the Authorization header
/// and returns the authenticated actor, the account and the session.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionStaff(actor, user, session): SessionStaff,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     // user: UserData
///     // session: SessionData
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - Authorization header is missing
/// - Authorization header format is invalid
/// - Session token is unknown or expired
/// - The account is disabled
pub struct SessionStaff(pub AuthenticatedActor, pub UserData, pub SessionData);

impl FromRequestParts<AppState> for SessionStaff {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        let mut persistence = state.persistence.lock().await;
        let (actor, user, session) =
            AuthenticationService::validate_session(&mut persistence, token).map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;

        debug!(
            user_id = user.user_id,
            role = ?actor.role,
            "Session validated successfully"
        );

        Ok(Self(actor, user, session))
    }
}

/// Session extraction errors.
///
/// These errors are returned when session validation fails and are
/// automatically converted to HTTP responses.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthorizationHeader => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header")
            }
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => {
                return (
                    StatusCode::UNAUTHORIZED,
                    format!("Session validation failed: {reason}"),
                )
                    .into_response();
            }
        };

        (status, message).into_response()
    }
}

/// Loads the stored key/value map of `session`.
///
/// # Errors
///
/// Returns an error if the values cannot be read.
pub fn load_session_state(
    persistence: &mut Persistence,
    session: &SessionData,
) -> Result<SessionState, PersistenceError> {
    let values = persistence.load_session_values(session.session_id)?;
    Ok(SessionState::from_values(values))
}

/// Writes `state` back to `session` if a handler changed it.
///
/// # Errors
///
/// Returns an error if the values cannot be written.
pub fn save_session_state(
    persistence: &mut Persistence,
    session: &SessionData,
    state: &SessionState,
) -> Result<(), PersistenceError> {
    if !state.is_modified() {
        return Ok(());
    }
    persistence.save_session_values(session.session_id, state.values())?;
    debug!(
        session_id = session.session_id,
        keys = state.values().len(),
        "Saved session values"
    );
    Ok(())
}
