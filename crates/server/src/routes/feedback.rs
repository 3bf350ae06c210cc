//! Feedback form route handlers.
//!
//! The form is public. Submissions are mailed to the office mailbox; any
//! delivery failure is reported to the visitor as a notice, never as a
//! server error.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bizdesk_core::Email;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, push_flash};
use crate::models::Flash;
use crate::services::FeedbackMessage;
use crate::state::AppState;

/// Feedback form data, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub name: String,
    pub email: String,
    pub feedback: String,
}

impl FeedbackForm {
    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns a visitor-facing message describing the first problem.
    pub fn to_message(&self) -> std::result::Result<FeedbackMessage, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Please enter your name.".to_string());
        }
        let email =
            Email::parse(&self.email).map_err(|e| format!("Please enter a valid email ({e})."))?;
        let message = self.feedback.trim();
        if message.is_empty() {
            return Err("Please enter your feedback.".to_string());
        }

        Ok(FeedbackMessage {
            name: name.to_owned(),
            email,
            message: message.to_owned(),
        })
    }
}

/// Feedback page template.
#[derive(Template, WebTemplate)]
#[template(path = "feedback.html")]
pub struct FeedbackTemplate {
    pub page: PageContext,
    pub form: FeedbackForm,
}

/// Display the feedback form.
pub async fn form(page: PageContext) -> impl IntoResponse {
    FeedbackTemplate {
        page,
        form: FeedbackForm::default(),
    }
}

/// Handle feedback submission.
#[instrument(skip_all, fields(email = %form.email.trim()))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<FeedbackForm>,
) -> Result<Response> {
    let message = match form.to_message() {
        Ok(message) => message,
        Err(reason) => {
            tracing::debug!(reason = %reason, "Rejected feedback form");
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                FeedbackTemplate {
                    page: page.with_flash(Flash::danger(reason)),
                    form,
                },
            )
                .into_response());
        }
    };

    let flash = match state.notifier().send_feedback(&message).await {
        Ok(()) => {
            tracing::info!("Feedback delivered");
            add_breadcrumb("feedback", "Feedback delivered", None);
            Flash::success("Thank you for your feedback!")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to send feedback");
            Flash::danger(format!("Error sending feedback: {e}"))
        }
    };

    push_flash(&session, flash).await?;
    Ok(Redirect::to("/feedback").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, feedback: &str) -> FeedbackForm {
        FeedbackForm {
            name: name.to_string(),
            email: email.to_string(),
            feedback: feedback.to_string(),
        }
    }

    #[test]
    fn test_to_message_trims() {
        let message = form(" Jane ", "jane@example.com", " Love it \n")
            .to_message()
            .unwrap();
        assert_eq!(message.name, "Jane");
        assert_eq!(message.message, "Love it");
    }

    #[test]
    fn test_to_message_rejects_bad_input() {
        assert!(form("", "jane@example.com", "hi").to_message().is_err());
        assert!(form("Jane", "not-an-email", "hi").to_message().is_err());
        assert!(form("Jane", "jane@example.com", "  ").to_message().is_err());
    }
}
