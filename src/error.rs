// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request-level error taxonomy.
//!
//! Every recoverable failure in the pipeline becomes an [`AppError`] variant
//! and is mapped to an HTTP response in exactly one place, the
//! [`IntoResponse`] impl below. Nothing else in the crate writes error
//! responses. Configuration errors are not here: they abort startup before
//! the listener binds.

use crate::mailer::TransportError;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body was not a parseable JSON object
    #[error("malformed request body: {0}")]
    BadRequest(String),

    /// Payload shape or field constraint violated
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Client exhausted its window quota
    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Mail relay unreachable, rejected the message, or timed out
    #[error("email sending failed: {message}")]
    Transport {
        message: String,
        details: Option<String>,
    },

    /// Anything else; surfaces as a generic 500 with no detail
    #[error("internal error")]
    Internal,
}

impl AppError {
    /// Wrap a transport failure, attaching detail only when the deployment
    /// allows exposing it.
    pub fn transport(err: TransportError, expose_details: bool) -> Self {
        Self::Transport {
            message: "Failed to send message".to_string(),
            details: expose_details.then(|| err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Validation failed",
                    message,
                    details: None,
                }),
            )
                .into_response(),

            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Validation failed",
                    message: err.to_string(),
                    details: None,
                }),
            )
                .into_response(),

            AppError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(ErrorResponse {
                    error: "Too many requests",
                    message: format!("Please try again in {retry_after_secs} seconds"),
                    details: None,
                }),
            )
                .into_response(),

            AppError::Transport { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Email sending failed",
                    message,
                    details,
                }),
            )
                .into_response(),

            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error",
                    message: "Something went wrong".to_string(),
                    details: None,
                }),
            )
                .into_response(),
        }
    }
}

/// Panic boundary for the outermost layer: any unhandled fault still gets a
/// generic response with no internal detail.
pub fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Unhandled panic while processing request");
    AppError::Internal.into_response()
}
