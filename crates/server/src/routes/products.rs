//! Inventory route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::invalid_input;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, push_flash};
use crate::models::fields::FieldProblem;
use crate::models::{FieldError, Flash, Product, fields};
use crate::state::AppState;

/// New product form data, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    /// Validate every field and build the record.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError`] found. A blank stock counts as zero.
    pub fn to_product(&self) -> std::result::Result<Product, FieldError> {
        Ok(Product {
            name: fields::required_text("name", &self.name)?,
            category: fields::required_text("category", &self.category)?,
            price: fields::amount("price", &self.price)?,
            stock: fields::count_or_zero("stock", &self.stock)?,
        })
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
    pub inventory_value: Decimal,
}

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/new.html")]
pub struct NewProductTemplate {
    pub page: PageContext,
    pub form: ProductForm,
}

/// List all products in the order they were added.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> impl IntoResponse {
    let repo = state.store().products();
    ProductsTemplate {
        page,
        products: repo.list().await,
        inventory_value: repo.stock_value().await,
    }
}

/// Display the new product form.
pub async fn new(RequireAuth(_user): RequireAuth, page: PageContext) -> impl IntoResponse {
    NewProductTemplate {
        page,
        form: ProductForm::default(),
    }
}

/// Handle new product submission.
#[instrument(skip_all, fields(user = %user.username, name = %form.name.trim()))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product = match form.to_product() {
        Ok(product) => product,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected product form");
            return Ok(rejected(page, form, &e));
        }
    };

    if let Err(e) = state.store().products().create(product.clone()).await {
        tracing::warn!(error = %e, "Rejected product: running total would overflow");
        return Ok(rejected(
            page,
            form,
            &FieldError::new("price", FieldProblem::TooLarge),
        ));
    }

    tracing::info!(
        category = %product.category,
        price = %product.price,
        stock = product.stock,
        "Product added"
    );
    add_breadcrumb("inventory", "Product added", Some(&[("name", product.name.as_str())]));

    push_flash(&session, Flash::success("Product added successfully!")).await?;
    Ok(Redirect::to("/products").into_response())
}

/// Re-render the form with a validation notice.
fn rejected(page: PageContext, form: ProductForm, err: &FieldError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        NewProductTemplate {
            page: page.with_flash(invalid_input(err)),
            form,
        },
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(price: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: " Widget ".to_string(),
            category: "Hardware".to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
        }
    }

    #[test]
    fn test_to_product() {
        let product = form("2.50", "3").to_product().unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, Decimal::new(25, 1));
        assert_eq!(product.stock, 3);
    }

    #[test]
    fn test_blank_stock_is_zero() {
        assert_eq!(form("1", "").to_product().unwrap().stock, 0);
    }

    #[test]
    fn test_non_numeric_price_names_field() {
        let err = form("cheap", "3").to_product().unwrap_err();
        assert_eq!(err.field, "price");
        assert_eq!(err.problem, FieldProblem::NotANumber);
    }
}
