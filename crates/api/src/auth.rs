// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use bookings_persistence::{Persistence, SessionData, UserData};
use std::fmt::Write;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::{info, warn};

use crate::error::AuthError;

/// Staff roles for authorization.
///
/// Roles apply only to staff accounts, never to guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: manages rooms and staff accounts, plus everything Staff may do.
    Admin,
    /// Staff role: manages reservations and the block calendar.
    Staff,
}

impl Role {
    /// Returns the stored name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Staff => "Staff",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Staff" => Ok(Self::Staff),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {s}"),
            }),
        }
    }
}

/// An authenticated staff member with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user ID of the staff member.
    pub user_id: i64,
    /// The login email.
    pub email: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, email: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    fn from_user(user: &UserData) -> Result<Self, AuthError> {
        Ok(Self::new(user.user_id, user.email.clone(), user.role.parse()?))
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor is an Admin.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The action being attempted, for the error message
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Staff => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from(Role::Admin.as_str()),
            }),
        }
    }
}

/// Authentication service for bearer-token sessions.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates a staff member by email and password and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The login email (case-insensitive)
    /// * `password` - The plain-text password
    /// * `session_duration` - How long the new session stays valid
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong, the account is disabled,
    /// or the session cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        session_duration: Duration,
    ) -> Result<(String, AuthenticatedActor, UserData), AuthError> {
        // Unknown email and wrong password read the same to the caller
        let rejected = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        };

        let user: UserData = persistence
            .get_user_by_email(email)
            .map_err(Self::database_error)?
            .ok_or_else(rejected)?;

        let password_matches: bool = persistence
            .verify_password(password, &user.password_hash)
            .map_err(Self::database_error)?;
        if !password_matches {
            warn!(user_id = user.user_id, "Rejected login with wrong password");
            return Err(rejected());
        }

        if user.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;
        let session_token: String = Self::generate_session_token();
        let expires_at: String =
            Self::format_timestamp(OffsetDateTime::now_utc() + session_duration)?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at)
            .map_err(Self::database_error)?;
        persistence
            .update_last_login(user.user_id)
            .map_err(Self::database_error)?;

        info!(user_id = user.user_id, "Staff member logged in");
        Ok((session_token, actor, user))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `user_data`, `session_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or expired, or the account
    /// is gone or disabled.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserData, SessionData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::database_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = Self::parse_timestamp(&session.expires_at)?;
        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::database_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        if user.is_disabled {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is disabled"),
            });
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::database_error)?;

        Ok((actor, user, session))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(Self::database_error)
    }

    /// Generates a 256-bit random session token, hex encoded.
    fn generate_session_token() -> String {
        let mut bytes: [u8; 32] = [0; 32];
        rand::fill(&mut bytes[..]);
        bytes.iter().fold(String::with_capacity(64), |mut token, byte| {
            let _ = write!(token, "{byte:02x}");
            token
        })
    }

    /// Formats a timestamp the way `SQLite`'s `CURRENT_TIMESTAMP` does, so
    /// stored expiries compare correctly in SQL.
    fn format_timestamp(at: OffsetDateTime) -> Result<String, AuthError> {
        at.format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format session expiration: {e}"),
            })
    }

    fn parse_timestamp(value: &str) -> Result<OffsetDateTime, AuthError> {
        PrimitiveDateTime::parse(
            value,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to parse session expiration: {e}"),
        })
    }

    fn database_error(err: bookings_persistence::PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
