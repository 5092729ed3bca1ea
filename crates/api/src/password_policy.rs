// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy for staff accounts.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,

    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password uses too few character classes.
    #[error(
        "Password must mix at least {required} of: uppercase, lowercase, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password repeats the account's email or name.
    #[error("Password must not contain the account {field}")]
    ContainsAccountDetail { field: String },
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length, in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// Validates a new staff password.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to validate
    /// * `confirmation` - The password confirmation
    /// * `email` - The account email; neither it nor its local part may appear
    /// * `first_name` - The account first name; it may not appear
    ///
    /// # Errors
    ///
    /// Returns the first policy rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        first_name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = character_classes(password);
        if found < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found,
            });
        }

        let lowered: String = password.to_lowercase();
        let email: String = email.trim().to_lowercase();
        let local_part: &str = email.split('@').next().unwrap_or_default();
        if !local_part.is_empty() && lowered.contains(local_part) {
            return Err(PasswordPolicyError::ContainsAccountDetail {
                field: String::from("email"),
            });
        }

        let first_name: String = first_name.trim().to_lowercase();
        if first_name.chars().count() >= 3 && lowered.contains(&first_name) {
            return Err(PasswordPolicyError::ContainsAccountDetail {
                field: String::from("name"),
            });
        }

        Ok(())
    }
}

/// Counts uppercase, lowercase, digit and symbol classes present.
fn character_classes(password: &str) -> usize {
    let classes: [fn(&char) -> bool; 4] = [
        char::is_ascii_uppercase,
        char::is_ascii_lowercase,
        char::is_ascii_digit,
        |c: &char| !c.is_alphanumeric() && !c.is_whitespace(),
    ];

    classes
        .iter()
        .filter(|class| password.chars().any(|c| class(&c)))
        .count()
}
