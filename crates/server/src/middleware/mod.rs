//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, moka-backed store, signed cookie)
//!
//! Authentication is not a layer: protected handlers take a [`RequireAuth`]
//! extractor, and every page takes a [`PageContext`] for its flash notice.

pub mod auth;
pub mod flash;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use flash::{PageContext, push_flash, take_flash};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
