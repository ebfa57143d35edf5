//! Service for sending content change and contact form notifications.
//!
//! Formats a change request or a contact message into an email and hands it
//! to a [`ChangeNotifier`].
//! Mail transport lives outside this crate; the service only reports whether
//! the hand-off succeeded.

use crate::config::{CHANGE_EMAIL_SUBJECT, CONTACT_EMAIL_SUBJECT};
use crate::error::{AppError, Result};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::Value;

const RULE_WIDTH: usize = 60;
const PREVIEW_CHARS: usize = 150;
const NO_MESSAGE: &str = "No message provided";

/// One edited field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub section: String,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// Payload of an edit submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub updated_data: Value,
    pub original_data: Value,
    pub changes: Vec<Change>,
}

/// Message left through the contact form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactRequest {
    pub email: String,
    pub message: String,
}

/// A formatted plain-text email.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

/// Outcome shown by the edit form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error(String),
}

/// Delivers formatted messages somewhere a person will read them.
pub trait ChangeNotifier {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Notifier that writes the message to the application log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!("{}\n\n{}", message.subject, message.body);
        Ok(())
    }
}

fn preview(value: &str) -> String {
    let mut chars = value.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Renders `request` as the email sent to the site maintainer.
pub fn format_change_email(request: &ChangeRequest) -> Result<EmailMessage> {
    let heavy_rule = "=".repeat(RULE_WIDTH);
    let light_rule = "-".repeat(RULE_WIDTH);

    let mut body = String::from("Hello,\n\n");
    body.push_str("The following changes have been requested for the website:\n\n");
    body.push_str(&heavy_rule);
    body.push_str("\n\n");

    if !request.changes.is_empty() {
        body.push_str("CHANGES SUMMARY:\n");
        body.push_str(&light_rule);
        body.push('\n');
        for (n, change) in request.changes.iter().enumerate() {
            body.push_str(&format!(
                "\n{}. {} - {}\n   Old: {}\n   New: {}\n",
                n + 1,
                change.section,
                change.field,
                preview(&change.old_value),
                preview(&change.new_value),
            ));
        }
        body.push('\n');
        body.push_str(&heavy_rule);
        body.push_str("\n\n");
    }

    body.push_str("UPDATED JSON:\n");
    body.push_str(&light_rule);
    body.push_str("\n\n");
    body.push_str(
        &serde_json::to_string_pretty(&request.updated_data)
            .map_err(|e| AppError::Notification(e.to_string()))?,
    );

    Ok(EmailMessage {
        subject: CHANGE_EMAIL_SUBJECT.to_string(),
        body,
    })
}

/// Renders a contact form submission. The reply address is required.
pub fn format_contact_email(request: &ContactRequest) -> Result<EmailMessage> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }
    let message = match request.message.trim() {
        "" => NO_MESSAGE,
        message => message,
    };

    Ok(EmailMessage {
        subject: CONTACT_EMAIL_SUBJECT.to_string(),
        body: format!("Email: {}\nMessage: {}\n", email, message),
    })
}

/// Service that turns edit and contact submissions into notifications.
pub struct NotificationService<N: ChangeNotifier> {
    notifier: N,
}

impl<N: ChangeNotifier> NotificationService<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Formats and sends `request`. Failures are reported, never retried.
    pub fn submit(&self, request: &ChangeRequest) -> SubmitStatus {
        let result =
            format_change_email(request).and_then(|message| self.notifier.send(&message));
        if result.is_ok() {
            info!(
                "Change notification sent with {} change(s)",
                request.changes.len()
            );
        }
        Self::status("change notification", result)
    }

    /// Validates, formats and sends a contact form message.
    pub fn submit_contact(&self, request: &ContactRequest) -> SubmitStatus {
        let result =
            format_contact_email(request).and_then(|message| self.notifier.send(&message));
        if result.is_ok() {
            info!("Contact message from {} sent", request.email.trim());
        }
        Self::status("contact message", result)
    }

    fn status(what: &str, result: Result<()>) -> SubmitStatus {
        match result {
            Ok(()) => SubmitStatus::Success,
            Err(e @ AppError::Validation(_)) => {
                warn!("Rejected {}: {}", what, e);
                SubmitStatus::Error(e.to_string())
            }
            Err(e) => {
                error!("Failed to send {}: {}", what, e);
                SubmitStatus::Error(e.to_string())
            }
        }
    }
}
