// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outgoing mail.
//!
//! Handlers build `MailMessage`s and hand them to a `Mailer`. Delivery
//! failures never undo the operation that triggered the mail.

use thiserror::Error;
use tracing::info;

/// Mail delivery errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MailError {
    /// The message could not be handed off.
    #[error("Mail delivery to {to} failed: {reason}")]
    Delivery { to: String, reason: String },
}

/// A plain-text mail message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Sends mail.
pub trait Mailer: Send + Sync {
    /// Delivers `message`.
    ///
    /// # Errors
    ///
    /// Returns `MailError::Delivery` if the message could not be sent.
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Mailer that writes every message to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailer;

impl Mailer for TracingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body_length = message.body.len(),
            "Mail queued"
        );
        Ok(())
    }
}
