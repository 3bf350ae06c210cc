//! Core types for Bizdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod role;
pub mod username;

pub use email::{Email, EmailError};
pub use role::UserRole;
pub use username::{Username, UsernameError};
