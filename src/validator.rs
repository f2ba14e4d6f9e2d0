// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact payload validation.
//!
//! Checks the submitted JSON shape and field constraints:
//! - `message` is required and must be non-empty after trimming
//! - `email` is optional but must look like an address when present
//! - `name` is optional and unconstrained
//!
//! Unknown payload fields are ignored.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Validation error types. The `Display` strings are user-facing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Invalid email format")]
    InvalidEmail,
}

/// Raw contact-form submission as received on the wire.
#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submission that passed validation. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: String,
}

impl ContactMessage {
    /// Name to show in the subject and body. The stored field is untouched.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Anonymous",
        }
    }

    /// Submitted address, if one was actually provided.
    pub fn sender_email(&self) -> Option<&str> {
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => Some(email),
            _ => None,
        }
    }
}

/// Validate a raw payload into a [`ContactMessage`].
pub fn validate(payload: ContactPayload) -> Result<ContactMessage, ValidationError> {
    let message = match payload.message {
        Some(m) if !m.trim().is_empty() => m,
        _ => {
            debug!("Validation failed: empty message");
            return Err(ValidationError::EmptyMessage);
        }
    };

    if let Some(email) = payload.email.as_deref() {
        if !email.is_empty() && !is_plausible_email(email) {
            debug!(email = %email, "Validation failed: implausible email");
            return Err(ValidationError::InvalidEmail);
        }
    }

    Ok(ContactMessage {
        name: payload.name,
        email: payload.email,
        message,
    })
}

/// Permissive syntactic check, not RFC parsing: one-or-more non-space/non-`@`
/// characters, `@`, same, `.`, same.
fn is_plausible_email(s: &str) -> bool {
    let mut parts = s.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}
