// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact relay service.
//!
//! One request moves through the pipeline: rate gate, body parse, field
//! validation, mail composition, transport send. Each early exit maps to a
//! response through [`AppError`]; the handler itself never writes an error
//! body.

use crate::config::Config;
use crate::error::{handle_panic, AppError};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::mailer::{compose, MailTransport};
use crate::validator::{validate, ContactPayload};
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub mailer: Arc<dyn MailTransport>,
    pub config: Config,
}

/// Success response for `POST /send`.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "messageId")]
    pub message_id: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Build the service router.
///
/// Cross-origin policy: only the configured frontend origin, only `POST`,
/// only the `Content-Type` header. Errors when the configured origin is not
/// a valid header value, so a bad `FRONTEND_URL` fails startup.
pub fn router(state: Arc<AppState>) -> Result<Router, axum::http::header::InvalidHeaderValue> {
    let origin: HeaderValue = state.config.frontend_url.parse()?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/health", get(health))
        .route("/send", post(send))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state))
}

/// Liveness endpoint: fixed healthy status and the current timestamp, no
/// dependency checks.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Accept a contact-form submission and relay it as email.
///
/// The client identifier is the peer address as supplied by the transport
/// layer; forwarded headers are not trusted. The rate gate runs before the
/// body is interpreted, so an over-quota caller gets 429 even with a
/// malformed payload.
pub async fn send(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> Result<Json<SendResponse>, AppError> {
    let client = addr.ip();

    match state.limiter.admit(client).await {
        RateLimitResult::Limited { retry_after } => {
            let retry_after_secs = retry_after.as_secs_f64().ceil() as u64;
            warn!(%client, retry_after_secs, "Request rate limited");
            return Err(AppError::RateLimited { retry_after_secs });
        }
        RateLimitResult::Allowed { remaining } => {
            debug!(%client, remaining, "Request admitted");
        }
    }

    let Json(payload) = payload.map_err(|rejection| {
        warn!(%client, error = %rejection.body_text(), "Malformed request body");
        AppError::BadRequest(rejection.body_text())
    })?;

    let message = validate(payload).map_err(|err| {
        info!(%client, error = %err, "Validation failed");
        AppError::Validation(err)
    })?;

    let mail = compose(&message, &state.config.smtp);
    let message_id = state.mailer.send(&mail).await.map_err(|err| {
        error!(%client, error = %err, "Email sending failed");
        AppError::transport(err, state.config.expose_error_details())
    })?;

    info!(%client, message_id = %message_id, "Message relayed");
    Ok(Json(SendResponse {
        success: true,
        message: "Message sent successfully",
        message_id,
    }))
}
