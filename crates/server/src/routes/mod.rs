//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /static/*               - Stylesheets and images
//!
//! # Auth (public)
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /register               - Register page
//! POST /register               - Register action
//! GET  /logout                 - Logout action
//!
//! # Feedback (public)
//! GET  /feedback               - Feedback form
//! POST /feedback               - Mail feedback to the office mailbox
//!
//! # Back office (requires auth)
//! GET  /                       - Dashboard
//! GET  /products               - Inventory listing
//! GET  /add_product            - New product form
//! POST /add_product            - Add product
//! GET  /sales_performance      - Sales listing and summary
//! GET  /add_sales              - New sale form
//! POST /add_sales              - Record sale
//! GET  /improve_sales          - Sales tips
//! GET  /lowstocks              - Low-stock report (default threshold)
//! POST /lowstocks              - Low-stock report (submitted threshold)
//! GET  /profit_and_loss        - Calculator
//! POST /profit_and_loss        - Calculate
//! GET  /view_employees         - Staff roster
//! GET  /add_employee           - New employee form
//! POST /add_employee           - Add employee
//! ```

pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod feedback;
pub mod finance;
pub mod inventory;
pub mod products;
pub mod sales;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::config::ConfigError;
use crate::middleware::{create_session_layer, request_id_middleware};
use crate::models::{FieldError, Flash};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/server/static";

/// Notice shown when a record form fails validation.
pub const INVALID_INPUT: &str = "Invalid input. Please check your data.";

/// Danger flash naming the rejected field.
pub(crate) fn invalid_input(err: &FieldError) -> Flash {
    Flash::danger(format!("{INVALID_INPUT} ({err})"))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
}

/// Create the back-office routes router.
pub fn office_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::home))
        .route("/products", get(products::index))
        .route("/add_product", get(products::new).post(products::create))
        .route("/sales_performance", get(sales::index))
        .route("/add_sales", get(sales::new).post(sales::create))
        .route("/improve_sales", get(sales::improve))
        .route("/lowstocks", get(inventory::low_stock).post(inventory::low_stock_with_threshold))
        .route("/profit_and_loss", get(finance::calculator).post(finance::calculate))
        .route("/view_employees", get(employees::index))
        .route("/add_employee", get(employees::new).post(employees::create))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(office_routes())
        .route("/feedback", get(feedback::form).post(feedback::submit))
}

/// Build the full application: routes, static files, sessions, request IDs
/// and request tracing.
///
/// # Errors
///
/// Returns `ConfigError` if the session layer cannot be built from the
/// configured secret.
pub fn app(state: AppState) -> Result<Router, ConfigError> {
    let session_layer = create_session_layer(state.config())?;

    Ok(Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
