//! Authentication route handlers.
//!
//! Handles login, registration and logout against the in-memory user store.

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

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    OptionalAuth, PageContext, clear_current_user, push_flash, set_current_user,
};
use crate::models::{CurrentUser, Flash};
use crate::services::auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub username: String,
    pub min_password_length: usize,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: PageContext) -> impl IntoResponse {
    LoginTemplate {
        page,
        username: String::new(),
    }
}

/// Handle login form submission.
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match AuthService::new(state.store())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            push_flash(&session, Flash::success("Login successful!")).await?;
            set_sentry_user(user.username.as_str());
            add_breadcrumb("auth", "Logged in", None);
            tracing::info!(role = %user.role, "User logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed: invalid credentials");
            Ok((
                StatusCode::UNAUTHORIZED,
                LoginTemplate {
                    page: page.with_flash(Flash::danger("Invalid credentials")),
                    username: form.username,
                },
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: PageContext) -> impl IntoResponse {
    RegisterTemplate {
        page,
        username: String::new(),
        min_password_length: MIN_PASSWORD_LENGTH,
    }
}

/// Handle registration form submission.
#[instrument(skip_all, fields(username = %form.username.trim()))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let result = AuthService::new(state.store())
        .register(&form.username, &form.password, &form.confirm_password)
        .await;

    let (status, message) = match result {
        Ok(user) => {
            tracing::info!(username = %user.username, "User registered");
            push_flash(&session, Flash::success("Registration successful. Please log in.")).await?;
            return Ok(Redirect::to("/login").into_response());
        }
        Err(AuthError::UserAlreadyExists) => {
            (StatusCode::CONFLICT, "Username already exists.".to_string())
        }
        Err(AuthError::PasswordMismatch) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Passwords do not match.".to_string(),
        ),
        Err(AuthError::WeakPassword(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        ),
        Err(AuthError::InvalidUsername(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Invalid username: {e}."),
        ),
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(status = %status, reason = %message, "Registration rejected");
    Ok((
        status,
        RegisterTemplate {
            page: page.with_flash(Flash::danger(message)),
            username: form.username,
            min_password_length: MIN_PASSWORD_LENGTH,
        },
    )
        .into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out and return to the login page.
///
/// Without a signed-in user the session is left untouched, so no record is
/// stored for anonymous visitors.
pub async fn logout(OptionalAuth(user): OptionalAuth, session: Session) -> Result<Redirect> {
    let Some(user) = user else {
        return Ok(Redirect::to("/login"));
    };
    clear_current_user(&session).await?;
    clear_sentry_user();
    push_flash(&session, Flash::success("Logged out successfully!")).await?;
    tracing::info!(username = %user.username, "User logged out");
    Ok(Redirect::to("/login"))
}
