//! One-shot flash notices.
//!
//! A handler pushes a [`Flash`] before redirecting; the next page that takes a
//! [`PageContext`] removes it from the session and renders it once.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentUser, Flash, session_keys};

/// Store a notice for the next rendered page, replacing any pending one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_flash(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, flash).await
}

/// Remove and return the pending notice, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_flash(session: &Session) -> Result<Option<Flash>, tower_sessions::session::Error> {
    session.remove::<Flash>(session_keys::FLASH).await
}

/// Per-page layout data: the pending flash notice and who is signed in.
///
/// Extracting it consumes the flash, so only take it in handlers that render
/// a page.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub flash: Option<Flash>,
    pub user: Option<CurrentUser>,
}

impl PageContext {
    /// Replace the notice with one raised while handling this request.
    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    #[must_use]
    pub const fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    /// Name shown in the navigation bar.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self::default());
        };

        let flash = take_flash(session).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read flash from session");
            None
        });
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();

        Ok(Self { flash, user })
    }
}
