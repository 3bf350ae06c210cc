//! Sales route handlers.
//!
//! Sales are free-standing records: `product_name` is not checked against
//! the inventory and recording a sale does not change stock levels.

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

use super::invalid_input;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, push_flash};
use crate::models::fields::FieldProblem;
use crate::models::{FieldError, Flash, Sale, SalesSummary, fields};
use crate::state::AppState;

/// New sale form data, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaleForm {
    pub product_name: String,
    pub salesperson_id: String,
    pub customer_id: String,
    pub sale_date: String,
    pub quantity: String,
    pub total_amount: String,
}

impl SaleForm {
    /// Validate every field and build the record.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError`] found.
    pub fn to_sale(&self) -> std::result::Result<Sale, FieldError> {
        Ok(Sale {
            product_name: fields::required_text("product_name", &self.product_name)?,
            salesperson_id: fields::required_text("salesperson_id", &self.salesperson_id)?,
            customer_id: fields::required_text("customer_id", &self.customer_id)?,
            sale_date: fields::date("sale_date", &self.sale_date)?,
            quantity: fields::positive_count("quantity", &self.quantity)?,
            total_amount: fields::amount("total_amount", &self.total_amount)?,
        })
    }
}

/// A link on the sales tips page.
#[derive(Debug, Clone, Copy)]
pub struct SalesTip {
    pub title: &'static str,
    pub link: &'static str,
}

/// Tips shown on the improve-sales page.
pub const SALES_TIPS: &[SalesTip] = &[
    SalesTip {
        title: "Upselling Techniques",
        link: "https://example.com/upselling",
    },
    SalesTip {
        title: "Customer Retention Strategies",
        link: "https://example.com/customer-retention",
    },
];

/// Sales listing template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/index.html")]
pub struct SalesTemplate {
    pub page: PageContext,
    pub sales: Vec<Sale>,
    pub summary: SalesSummary,
}

/// New sale form template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/new.html")]
pub struct NewSaleTemplate {
    pub page: PageContext,
    pub form: SaleForm,
}

/// Sales tips template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/improve.html")]
pub struct ImproveSalesTemplate {
    pub page: PageContext,
    pub tips: Vec<SalesTip>,
}

/// List every sale with totals per product.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> impl IntoResponse {
    let sales = state.store().sales().list().await;
    let summary = SalesSummary::from_sales(&sales);
    SalesTemplate {
        page,
        sales,
        summary,
    }
}

/// Display the new sale form.
pub async fn new(RequireAuth(_user): RequireAuth, page: PageContext) -> impl IntoResponse {
    NewSaleTemplate {
        page,
        form: SaleForm::default(),
    }
}

/// Handle new sale submission.
#[instrument(skip_all, fields(user = %user.username, product = %form.product_name.trim()))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Form(form): Form<SaleForm>,
) -> Result<Response> {
    let sale = match form.to_sale() {
        Ok(sale) => sale,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected sale form");
            return Ok(rejected(page, form, &e));
        }
    };

    if let Err(e) = state.store().sales().create(sale.clone()).await {
        tracing::warn!(error = %e, "Rejected sale: running total would overflow");
        return Ok(rejected(
            page,
            form,
            &FieldError::new("total_amount", FieldProblem::TooLarge),
        ));
    }

    tracing::info!(
        salesperson_id = %sale.salesperson_id,
        customer_id = %sale.customer_id,
        sale_date = %sale.sale_date,
        quantity = sale.quantity,
        total_amount = %sale.total_amount,
        "Sale recorded"
    );
    add_breadcrumb(
        "sales",
        "Sale recorded",
        Some(&[("product_name", sale.product_name.as_str())]),
    );

    push_flash(&session, Flash::success("Sales record added successfully!")).await?;
    Ok(Redirect::to("/sales_performance").into_response())
}

/// Display the sales tips page.
pub async fn improve(RequireAuth(_user): RequireAuth, page: PageContext) -> impl IntoResponse {
    ImproveSalesTemplate {
        page,
        tips: SALES_TIPS.to_vec(),
    }
}

/// Re-render the form with a validation notice.
fn rejected(page: PageContext, form: SaleForm, err: &FieldError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        NewSaleTemplate {
            page: page.with_flash(invalid_input(err)),
            form,
        },
    )
        .into_response()
}
