// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact relay service.
//!
//! Everything is sourced from environment variables. The three SMTP
//! credentials (`EMAIL`, `PASSWORD`, `RECEIVER_EMAIL`) are required and
//! their absence aborts startup before the listener binds; everything else
//! has a default.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Error raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Configuration for the contact relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen port (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed cross-origin caller (default: http://localhost:5173)
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Deployment environment; "production" suppresses error detail
    #[serde(default = "default_env")]
    pub env: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// SMTP relay configuration
    pub smtp: SmtpConfig,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window per client (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 900)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Capacity bound on the client map (default: 4096)
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay host, implicit TLS on port 465 (default: smtp.gmail.com)
    #[serde(default = "default_smtp_host")]
    pub host: String,

    /// Auth identity, also the sender address
    pub username: String,

    /// Auth credential
    pub password: String,

    /// Destination address for relayed messages
    pub receiver: String,

    /// Bound on a single send call in seconds (default: 15)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_port() -> u16 {
    8000
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_env() -> String {
    "development".to_string()
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    900 // 15 minutes
}

fn default_max_clients() -> usize {
    4096
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            max_clients: default_max_clients(),
        }
    }
}

impl RateLimitConfig {
    /// Get the window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl SmtpConfig {
    /// Get the send timeout duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails on a missing required variable or an unparseable override so
    /// the process exits before binding the listener.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_var("PORT", default_port())?,
            frontend_url: std::env::var("FRONTEND_URL").unwrap_or_else(|_| default_frontend_url()),
            env: std::env::var("APP_ENV").unwrap_or_else(|_| default_env()),
            rate_limit: RateLimitConfig {
                max_requests: parse_var("RATE_LIMIT_MAX", default_max_requests())?,
                window_secs: parse_var("RATE_LIMIT_WINDOW_SECS", default_window_secs())?,
                max_clients: parse_var("RATE_LIMIT_MAX_CLIENTS", default_max_clients())?,
            },
            smtp: SmtpConfig {
                host: std::env::var("SMTP_HOST").unwrap_or_else(|_| default_smtp_host()),
                username: require_var("EMAIL")?,
                password: require_var("PASSWORD")?,
                receiver: require_var("RECEIVER_EMAIL")?,
                timeout_secs: parse_var("SMTP_TIMEOUT_SECS", default_timeout_secs())?,
            },
        })
    }

    /// Whether transport error detail may be exposed in responses.
    pub fn expose_error_details(&self) -> bool {
        self.env != "production"
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            var: name,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}
