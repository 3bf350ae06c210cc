//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::{Product, Sale, saturating_total};
use crate::state::AppState;

/// Headline figures shown above the tables.
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub products: usize,
    pub sales: usize,
    pub employees: usize,
    pub low_stock: usize,
    pub low_stock_threshold: u32,
    pub revenue: Decimal,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageContext,
    pub stats: DashboardStats,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
}

/// Display the dashboard: current inventory, recorded sales and counts.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn home(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> impl IntoResponse {
    let store = state.store();
    let threshold = state.config().low_stock_threshold;

    let products = store.products().list().await;
    let sales = store.sales().list().await;
    let stats = DashboardStats {
        products: products.len(),
        sales: sales.len(),
        employees: store.employees().count().await,
        low_stock: products.iter().filter(|p| p.is_low_stock(threshold)).count(),
        low_stock_threshold: threshold,
        revenue: saturating_total(sales.iter().map(|s| s.total_amount)),
    };

    DashboardTemplate {
        page,
        stats,
        products,
        sales,
    }
}
