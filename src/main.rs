// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay Service
//!
//! Accepts contact-form submissions over HTTP and relays them as email
//! through an authenticated SMTP provider.
//!
//! ## Endpoints
//!
//! - `POST /send`: validate a submission, rate limit per client address,
//!   forward it to the configured receiver.
//! - `GET /health`: presence probe.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables. `EMAIL`, `PASSWORD`
//! and `RECEIVER_EMAIL` are required; the process exits before binding the
//! listener if any is missing.
//!
//! - `EMAIL`: SMTP auth identity and sender address (required)
//! - `PASSWORD`: SMTP auth credential (required)
//! - `RECEIVER_EMAIL`: destination address (required)
//! - `FRONTEND_URL`: allowed cross-origin caller (default: http://localhost:5173)
//! - `PORT`: listen port (default: 8000)
//! - `APP_ENV`: "production" suppresses error detail in responses
//! - `SMTP_HOST`: relay host (default: smtp.gmail.com)
//! - `RATE_LIMIT_MAX` / `RATE_LIMIT_WINDOW_SECS`: quota per client (default: 5 per 900s)

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_relay::{
    config::Config,
    handlers::{router, AppState},
    limiter::RateLimiter,
    mailer::SmtpMailer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration; missing secrets abort here, before the bind
    let config = Config::from_env().context("loading configuration")?;
    info!(
        port = config.port,
        env = %config.env,
        frontend_url = %config.frontend_url,
        max_requests = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        smtp_host = %config.smtp.host,
        "Starting contact relay"
    );

    let mailer = Arc::new(SmtpMailer::from_config(&config.smtp).context("building SMTP transport")?);

    // Connectivity probe runs in the background; readiness is logged, never fatal
    let probe = mailer.clone();
    tokio::spawn(async move {
        probe.verify().await;
    });

    // Create application state
    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        mailer,
        config: config.clone(),
    });

    // Spawn sweep task for expired client windows
    let sweep_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweep_state.limiter.cleanup().await;
        }
    });

    // Build router
    let app = router(state).context("FRONTEND_URL is not a valid origin")?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
