//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login, registration and operator seeding
//! - `notify` - Feedback delivery over SMTP

pub mod auth;
pub mod notify;

pub use auth::{AuthError, AuthService};
pub use notify::{DisabledNotifier, DynNotifier, FeedbackMessage, Notifier, NotifyError, SmtpNotifier};
