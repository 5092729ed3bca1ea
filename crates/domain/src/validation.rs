// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::GuestDetails;

/// Minimum length of a guest's first name.
pub const MIN_FIRST_NAME_LENGTH: usize = 3;

/// Maximum length of a room name.
pub const MAX_ROOM_NAME_LENGTH: usize = 100;

/// Minimum number of digits in a phone number.
const MIN_PHONE_DIGITS: usize = 7;

/// Validates a room display name.
///
/// # Errors
///
/// Returns an error if the name is blank or longer than
/// `MAX_ROOM_NAME_LENGTH` characters.
pub fn validate_room_name(room_name: &str) -> Result<(), DomainError> {
    let trimmed: &str = room_name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidRoomName(String::from(
            "Room name cannot be empty",
        )));
    }
    if trimmed.chars().count() > MAX_ROOM_NAME_LENGTH {
        return Err(DomainError::InvalidRoomName(format!(
            "Room name must be at most {MAX_ROOM_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates the guest fields of a reservation.
///
/// # Errors
///
/// Returns an error if:
/// - The first name is shorter than `MIN_FIRST_NAME_LENGTH` characters
/// - The last name is empty
/// - The email address is malformed
/// - The phone number is present but malformed
pub fn validate_guest_details(guest: &GuestDetails) -> Result<(), DomainError> {
    if guest.first_name.trim().chars().count() < MIN_FIRST_NAME_LENGTH {
        return Err(DomainError::InvalidGuestName(format!(
            "First name must be at least {MIN_FIRST_NAME_LENGTH} characters long"
        )));
    }

    if guest.last_name.trim().is_empty() {
        return Err(DomainError::InvalidGuestName(String::from(
            "Last name cannot be empty",
        )));
    }

    validate_email(&guest.email)?;

    if !guest.phone.trim().is_empty() {
        validate_phone(&guest.phone)?;
    }

    Ok(())
}

/// Validates the shape of an email address.
///
/// Accepts `local@domain.tld`: exactly one `@`, a non-empty local part, and
/// a domain of at least two non-empty dot-separated labels. No whitespace.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address does not match.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidEmail(email.to_string());

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a phone number: digits plus `+ - . ( )` and spaces, with at
/// least seven digits.
///
/// # Errors
///
/// Returns `DomainError::InvalidPhone` if the number does not match.
pub fn validate_phone(phone: &str) -> Result<(), DomainError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | '(' | ')' | ' ');
    if !phone.chars().all(allowed) {
        return Err(DomainError::InvalidPhone(phone.to_string()));
    }

    let digits: usize = phone.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_PHONE_DIGITS {
        return Err(DomainError::InvalidPhone(phone.to_string()));
    }

    Ok(())
}
