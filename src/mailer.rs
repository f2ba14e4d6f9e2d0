// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound mail composition and SMTP delivery.
//!
//! [`compose`] derives an [`OutboundMail`] deterministically from a validated
//! submission. Delivery goes through the [`MailTransport`] trait so the
//! handler never sees lettre types and tests can substitute a stub.

use crate::config::SmtpConfig;
use crate::validator::ContactMessage;
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Reply-to used when the submitter gave no address.
const FALLBACK_REPLY_TO: &str = "anonymous@portfolio.com";

/// Display name on the sender identity.
const FROM_DISPLAY_NAME: &str = "Portfolio Contact";

/// Transport error types.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("send timed out after {0:?}")]
    Timeout(Duration),
}

/// A fully composed outbound message, owned by the handler for the duration
/// of one send call.
#[derive(Debug, Clone)]
pub struct OutboundMail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Derive the outbound message from a validated submission.
pub fn compose(message: &ContactMessage, smtp: &SmtpConfig) -> OutboundMail {
    let name = message.display_name();
    let email = message.sender_email().unwrap_or("Not Provided");

    OutboundMail {
        from: format!("{FROM_DISPLAY_NAME} <{}>", smtp.username),
        to: smtp.receiver.clone(),
        reply_to: message
            .sender_email()
            .unwrap_or(FALLBACK_REPLY_TO)
            .to_string(),
        subject: format!("New Message from {name}"),
        text_body: render_text(name, email, &message.message),
        html_body: render_html(name, email, &message.message),
    }
}

fn render_text(name: &str, email: &str, message: &str) -> String {
    format!("Name: {name}\nEmail: {email}\n\nMessage:\n{message}\n")
}

/// All three interpolated fields are escaped; newlines in the message body
/// render as line breaks.
fn render_html(name: &str, email: &str, message: &str) -> String {
    let body = escape_html(message).replace('\n', "<br>");
    format!(
        "<h3>New Contact Form Submission</h3>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        escape_html(name),
        escape_html(email),
        body,
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Abstraction over the mail-sending collaborator.
///
/// Returns the message identifier reported back to the caller on success.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<String, TransportError>;
}

/// Production transport backed by an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

impl SmtpMailer {
    /// Build the relay transport from configuration. Implicit TLS on the
    /// relay's submission port.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, TransportError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout()))
            .build();

        Ok(Self {
            transport,
            timeout: config.timeout(),
        })
    }

    /// Startup connectivity probe. Logs readiness; never fatal.
    pub async fn verify(&self) {
        match self.transport.test_connection().await {
            Ok(true) => info!("SMTP relay is ready to take messages"),
            Ok(false) => warn!("SMTP relay refused the connection probe"),
            Err(err) => warn!(error = %err, "SMTP connection probe failed"),
        }
    }

    /// The relay reports no identifier of its own, so the Message-ID header
    /// is generated here and returned to the caller after a successful send.
    fn build_message(&self, mail: &OutboundMail) -> Result<(Message, String), TransportError> {
        let from: Mailbox = mail.from.parse()?;
        let to: Mailbox = mail.to.parse()?;
        let reply_to: Mailbox = mail.reply_to.parse()?;

        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

        let message = Message::builder()
            .from(from)
            .reply_to(reply_to)
            .to(to)
            .subject(mail.subject.clone())
            .message_id(Some(message_id.clone()))
            .multipart(MultiPart::alternative_plain_html(
                mail.text_body.clone(),
                mail.html_body.clone(),
            ))?;

        Ok((message, message_id))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutboundMail) -> Result<String, TransportError> {
        let (message, message_id) = self.build_message(mail)?;

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(response)) => {
                debug!(code = ?response.code(), message_id = %message_id, "Relay accepted message");
                Ok(message_id)
            }
            Ok(Err(err)) => Err(TransportError::Smtp(err)),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}
