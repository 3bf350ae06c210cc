//! Feedback delivery.
//!
//! Feedback submitted through the public form is mailed to a fixed mailbox.
//! Delivery sits behind the [`Notifier`] trait so the SMTP transport can be
//! swapped for [`DisabledNotifier`] when no credentials are configured, or
//! for a recording implementation in tests.

use std::sync::Arc;

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use bizdesk_core::Email;

use crate::config::MailConfig;

/// Shared handle to whichever notifier the application runs with.
pub type DynNotifier = Arc<dyn Notifier>;

/// Plain text body of the feedback email.
#[derive(Template)]
#[template(path = "email/feedback.txt")]
struct FeedbackEmailText<'a> {
    name: &'a str,
    email: &'a Email,
    message: &'a str,
}

/// HTML body of the feedback email.
#[derive(Template)]
#[template(path = "email/feedback.html")]
struct FeedbackEmailHtml<'a> {
    name: &'a str,
    email: &'a Email,
    message: &'a str,
}

/// Errors that can occur when delivering feedback.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// No SMTP credentials were configured.
    #[error("mail delivery is not configured")]
    NotConfigured,

    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A validated feedback submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub name: String,
    pub email: Email,
    pub message: String,
}

impl FeedbackMessage {
    /// Subject line of every feedback email.
    pub const SUBJECT: &'static str = "User Feedback";

    /// Render the plain text body.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if the template fails to render.
    pub fn text_body(&self) -> Result<String, askama::Error> {
        FeedbackEmailText {
            name: &self.name,
            email: &self.email,
            message: &self.message,
        }
        .render()
    }

    /// Render the HTML body.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if the template fails to render.
    pub fn html_body(&self) -> Result<String, askama::Error> {
        FeedbackEmailHtml {
            name: &self.name,
            email: &self.email,
            message: &self.message,
        }
        .render()
    }
}

/// Something that can deliver feedback.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one feedback submission.
    async fn send_feedback(&self, feedback: &FeedbackMessage) -> Result<(), NotifyError>;
}

/// SMTP delivery via lettre.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Create a new SMTP notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Smtp` if the relay cannot be set up, or
    /// `NotifyError::InvalidAddress` if a configured address is unusable.
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from: mailbox(&config.from_address)?,
            to: mailbox(&config.feedback_recipient)?,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_feedback(&self, feedback: &FeedbackMessage) -> Result<(), NotifyError> {
        let text = feedback.text_body()?;
        let html = feedback.html_body()?;

        let email = Message::builder()
            .from(self.from.clone())
            .reply_to(mailbox(&feedback.email)?)
            .to(self.to.clone())
            .subject(FeedbackMessage::SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %self.to, reply_to = %feedback.email, "Feedback email sent");
        Ok(())
    }
}

/// Stand-in used when no SMTP credentials are configured. Every send fails
/// with [`NotifyError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_feedback(&self, _feedback: &FeedbackMessage) -> Result<(), NotifyError> {
        Err(NotifyError::NotConfigured)
    }
}

fn mailbox(email: &Email) -> Result<Mailbox, NotifyError> {
    email
        .as_str()
        .parse()
        .map_err(|_| NotifyError::InvalidAddress(email.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn feedback() -> FeedbackMessage {
        FeedbackMessage {
            name: "Jane".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            message: "Great <b>service</b>".to_string(),
        }
    }

    #[test]
    fn test_text_body_layout() {
        assert_eq!(
            feedback().text_body().unwrap().trim_end(),
            "Name: Jane\nEmail: jane@example.com\nFeedback: Great <b>service</b>"
        );
    }

    #[test]
    fn test_html_body_escapes_message() {
        let html = feedback().html_body().unwrap();
        assert!(html.contains("Jane"));
        assert!(html.contains("&lt;b&gt;service&lt;/b&gt;"));
        assert!(!html.contains("<b>service</b>"));
    }

    #[tokio::test]
    async fn test_disabled_notifier_reports_not_configured() {
        let result = DisabledNotifier.send_feedback(&feedback()).await;
        assert!(matches!(result, Err(NotifyError::NotConfigured)));
    }

    #[test]
    fn test_mailbox_from_email() {
        let email = Email::parse("ops@bizdesk.example").unwrap();
        assert_eq!(mailbox(&email).unwrap().email.to_string(), "ops@bizdesk.example");
    }
}
