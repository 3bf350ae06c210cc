//! Bizdesk Core - Shared domain types.
//!
//! This crate provides the small value types used by every Bizdesk component:
//! - `server` - The back-office web application
//! - `cli` - Command-line helpers (password hashing, config checks)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no storage. Values are
//! validated once at construction so the rest of the workspace can rely on them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for usernames, emails and user roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
