use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use super::worker::Recipient;
use super::{Notification, NotificationKind};
use crate::config::NotificationConfig;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;

    /// A disabled mailer makes the worker skip delivery without a lookup.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Delivers through the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&ResendPayload {
                from: &self.from,
                to: [&message.to],
                subject: &message.subject,
                text: &message.text,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Stand-in used when no API key is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(to = %message.to, subject = %message.subject, "Email disabled, not sending");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

pub fn mailer_from_config(config: &NotificationConfig) -> Arc<dyn Mailer> {
    match config.resend_api_key.as_deref() {
        Some(key) if config.email_enabled() => {
            Arc::new(ResendMailer::new(key.trim(), config.from_header()))
        }
        _ => {
            tracing::warn!("RESEND_API_KEY is not set. Email notifications are disabled.");
            Arc::new(LogMailer)
        }
    }
}

fn greeting(recipient: &Recipient) -> &str {
    if recipient.full_name.trim().is_empty() {
        "there"
    } else {
        &recipient.full_name
    }
}

/// Plain-text rendering of a notification for one recipient.
pub fn compose(notification: &Notification, recipient: &Recipient, app_base_url: &str) -> EmailMessage {
    let name = greeting(recipient);

    let (subject, text) = match &notification.payload {
        NotificationKind::Welcome {
            workspace_name,
            workspace_slug,
        } => (
            format!("Welcome to Urpeer - {}!", workspace_name),
            format!(
                "Hi {name},\n\nWelcome to {workspace_name} on Urpeer. Share ideas, vote on \
                 what matters and follow the roadmap:\n{app_base_url}/{workspace_slug}\n"
            ),
        ),
        NotificationKind::NewComment {
            feedback_id,
            feedback_title,
            commenter_name,
            comment_preview,
            workspace_slug,
        } => (
            format!("New comment on \"{}\"", feedback_title),
            format!(
                "Hi {name},\n\n{commenter_name} commented on \"{feedback_title}\":\n\n\
                 {comment_preview}\n\nView the conversation:\n\
                 {app_base_url}/{workspace_slug}/feedback/{feedback_id}\n"
            ),
        ),
        NotificationKind::StatusChange {
            feedback_id,
            feedback_title,
            old_status,
            new_status,
            workspace_slug,
        } => (
            format!("Your feedback status updated: \"{}\"", feedback_title),
            format!(
                "Hi {name},\n\nThe status of \"{feedback_title}\" changed from {} to {}.\n\n\
                 View your feedback:\n{app_base_url}/{workspace_slug}/feedback/{feedback_id}\n",
                old_status.label(),
                new_status.label(),
            ),
        ),
    };

    EmailMessage {
        to: recipient.email.clone(),
        subject,
        text,
    }
}
