// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request-scoped session values.
//!
//! A `SessionState` is loaded from storage when a request starts, handed to
//! the engine, and written back when the request ends if anything changed.
//! Values are JSON strings so any serde type can be staged.

use crate::error::CoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The session key holding the flash message for the next render.
pub const FLASH_KEY: &str = "flash";

/// Key/value state attached to one authenticated session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    values: BTreeMap<String, String>,
    modified: bool,
}

impl SessionState {
    /// Creates an empty session state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            modified: false,
        }
    }

    /// Wraps values loaded from storage. The result is unmodified.
    #[must_use]
    pub const fn from_values(values: BTreeMap<String, String>) -> Self {
        Self {
            values,
            modified: false,
        }
    }

    /// Decodes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Session` if the stored JSON does not decode as `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        self.values
            .get(key)
            .map(|raw| {
                serde_json::from_str(raw).map_err(|e| CoreError::Session {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Encodes `value` and stores it under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Session` if `value` cannot be encoded.
    pub fn put_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), CoreError> {
        let raw: String = serde_json::to_string(value).map_err(|e| CoreError::Session {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.values.insert(key.to_string(), raw);
        self.modified = true;
        Ok(())
    }

    /// Removes the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let removed: Option<String> = self.values.remove(key);
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    /// Returns whether a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns whether any value was written or removed since loading.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the raw values.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Stores a flash message for the next render.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Session` if the message cannot be encoded.
    pub fn put_flash(&mut self, flash: &Flash) -> Result<(), CoreError> {
        self.put_json(FLASH_KEY, flash)
    }

    /// Takes the pending flash message, if any.
    ///
    /// An undecodable flash is dropped rather than reported.
    pub fn take_flash(&mut self) -> Option<Flash> {
        let flash: Option<Flash> = self.get_json(FLASH_KEY).ok().flatten();
        self.remove(FLASH_KEY);
        flash
    }
}

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    /// Everything the admin asked for happened.
    Success,
    /// Some of it did not.
    Warning,
}

/// A one-shot message shown on the next calendar render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Severity.
    pub level: FlashLevel,
    /// The message text.
    pub message: String,
}

impl Flash {
    /// Creates a success flash.
    #[must_use]
    pub fn success(message: &str) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.to_string(),
        }
    }

    /// Creates a warning flash.
    #[must_use]
    pub fn warning(message: &str) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.to_string(),
        }
    }
}
