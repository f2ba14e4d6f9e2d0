// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay
//!
//! This crate provides a minimal contact-form relay endpoint:
//!
//! - Fixed-window rate limiting per client address (5 per 15 minutes default)
//! - Payload validation (required message, plausible email)
//! - Mail composition and delivery through an authenticated SMTP relay
//! - Restrictive CORS (configured frontend origin, `POST` only)

pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod validator;

pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter};
pub use mailer::{MailTransport, OutboundMail};
pub use validator::{validate, ContactMessage};
