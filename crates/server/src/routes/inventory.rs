//! Low-stock report.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::{Flash, Product, fields};
use crate::state::AppState;

/// Notice shown when the submitted threshold is not a whole number >= 0.
pub const INVALID_THRESHOLD: &str = "Invalid input. Please enter a valid number.";

/// Threshold form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdForm {
    pub threshold: String,
}

/// Low-stock report template.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/low_stock.html")]
pub struct LowStockTemplate {
    pub page: PageContext,
    pub threshold: u32,
    pub products: Vec<Product>,
}

/// Report products below the configured default threshold.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn low_stock(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> impl IntoResponse {
    let threshold = state.config().low_stock_threshold;
    render(&state, page, threshold).await
}

/// Report products below a submitted threshold.
///
/// An unusable threshold is reported and the default is used instead.
#[instrument(skip_all, fields(user = %user.username, threshold = %form.threshold.trim()))]
pub async fn low_stock_with_threshold(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Form(form): Form<ThresholdForm>,
) -> impl IntoResponse {
    let default_threshold = state.config().low_stock_threshold;
    let (threshold, page) = match fields::count("threshold", &form.threshold) {
        Ok(threshold) => (threshold, page),
        Err(e) => {
            tracing::debug!(error = %e, default_threshold, "Rejected threshold, using default");
            (default_threshold, page.with_flash(Flash::danger(INVALID_THRESHOLD)))
        }
    };
    render(&state, page, threshold).await
}

async fn render(state: &AppState, page: PageContext, threshold: u32) -> LowStockTemplate {
    let products = state.store().products().low_stock(threshold).await;
    tracing::debug!(threshold, matches = products.len(), "Low-stock scan");
    LowStockTemplate {
        page,
        threshold,
        products,
    }
}
