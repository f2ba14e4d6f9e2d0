// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared fixtures for the contact relay tests: stub mail transports and
//! state/request builders.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request};
use contact_relay::config::{Config, RateLimitConfig, SmtpConfig};
use contact_relay::handlers::AppState;
use contact_relay::limiter::RateLimiter;
use contact_relay::mailer::{MailTransport, OutboundMail, TransportError};
use http_body_util::BodyExt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory transport: records what would have been sent, or fails every
/// send when constructed with `failing()`.
pub struct StubTransport {
    fail: bool,
    pub sent: Mutex<Vec<OutboundMail>>,
}

impl StubTransport {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_sent(&self) -> Option<OutboundMail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MailTransport for StubTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<String, TransportError> {
        if self.fail {
            return Err(TransportError::Timeout(Duration::from_secs(15)));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(mail.clone());
        Ok(format!("<stub-{}@relay.test>", sent.len()))
    }
}

/// Config with test-friendly defaults; rate limits mirror production policy.
pub fn test_config(env: &str) -> Config {
    Config {
        port: 0,
        frontend_url: "http://localhost:5173".to_string(),
        env: env.to_string(),
        rate_limit: RateLimitConfig {
            max_requests: 5,
            window_secs: 900,
            max_clients: 64,
        },
        smtp: SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            username: "relay@example.com".to_string(),
            password: "secret".to_string(),
            receiver: "inbox@example.com".to_string(),
            timeout_secs: 15,
        },
    }
}

pub fn test_state(transport: Arc<StubTransport>, config: Config) -> Arc<AppState> {
    Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        mailer: transport,
        config,
    })
}

/// POST /send with a JSON body, stamped with the given client address.
pub fn post_send(client: &str, body: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/send")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let addr: SocketAddr = format!("{client}:54321").parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub fn get_health() -> Request<Body> {
    let mut request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let addr: SocketAddr = "127.0.0.1:54321".parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
