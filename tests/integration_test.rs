// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the contact relay pipeline components.

mod harness;

use contact_relay::config::RateLimitConfig;
use contact_relay::limiter::{RateLimitResult, RateLimiter};
use contact_relay::mailer::{compose, MailTransport};
use contact_relay::validator::{validate, ContactPayload, ValidationError};
use harness::{test_config, StubTransport};
use std::net::IpAddr;

fn payload(name: Option<&str>, email: Option<&str>, message: Option<&str>) -> ContactPayload {
    ContactPayload {
        name: name.map(String::from),
        email: email.map(String::from),
        message: message.map(String::from),
    }
}

#[tokio::test]
async fn full_relay_flow() {
    let config = test_config("development");
    let limiter = RateLimiter::new(config.rate_limit.clone());
    let transport = StubTransport::succeeding();

    let client: IpAddr = "192.168.1.100".parse().unwrap();

    // Admit the request
    let admission = limiter.admit(client).await;
    assert!(matches!(admission, RateLimitResult::Allowed { .. }));

    // Validate the submission
    let message = validate(payload(
        Some("Alice"),
        Some("alice@example.com"),
        Some("Hello"),
    ))
    .unwrap();

    // Compose and send
    let mail = compose(&message, &config.smtp);
    let message_id = transport.send(&mail).await.unwrap();
    assert!(!message_id.is_empty());

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.to, "inbox@example.com");
    assert_eq!(sent.reply_to, "alice@example.com");
    assert_eq!(sent.subject, "New Message from Alice");
}

#[tokio::test]
async fn rate_limit_exhaustion() {
    let limiter = RateLimiter::new(RateLimitConfig {
        max_requests: 3,
        window_secs: 900,
        max_clients: 64,
    });

    let client: IpAddr = "10.0.0.1".parse().unwrap();

    for i in 0..3 {
        let result = limiter.admit(client).await;
        assert!(
            matches!(result, RateLimitResult::Allowed { .. }),
            "request {} should be admitted",
            i + 1
        );
    }

    let result = limiter.admit(client).await;
    assert!(matches!(result, RateLimitResult::Limited { .. }));
    assert!(result.retry_after_secs().unwrap() <= 900);
}

#[tokio::test]
async fn validation_rejects_bad_submissions() {
    assert_eq!(
        validate(payload(Some("Alice"), None, Some("  "))).unwrap_err(),
        ValidationError::EmptyMessage
    );
    assert_eq!(
        validate(payload(None, Some("not-an-email"), Some("hi"))).unwrap_err(),
        ValidationError::InvalidEmail
    );
}

#[tokio::test]
async fn failed_send_carries_transport_error() {
    let config = test_config("development");
    let transport = StubTransport::failing();

    let message = validate(payload(None, None, Some("Hello"))).unwrap();
    let mail = compose(&message, &config.smtp);

    let err = transport.send(&mail).await.unwrap_err();
    assert!(err.to_string().contains("timed out"));
    assert_eq!(transport.sent_count(), 0);
}
