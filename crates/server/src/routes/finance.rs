//! Profit and loss calculator.
//!
//! A stateless calculator: nothing submitted here is stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::fields::FieldProblem;
use crate::models::{FieldError, Flash, ProfitAndLoss, fields};

/// Notice shown when either figure is not a number.
pub const INVALID_FIGURES: &str = "Invalid input. Please enter valid numbers.";

/// Calculator form data, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfitAndLossForm {
    pub total_sales: String,
    pub total_costs: String,
}

impl ProfitAndLossForm {
    /// Parse both figures and compute the result.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError`] found.
    pub fn calculate(&self) -> Result<ProfitAndLoss, FieldError> {
        ProfitAndLoss::compute(
            fields::signed_amount("total_sales", &self.total_sales)?,
            fields::signed_amount("total_costs", &self.total_costs)?,
        )
        .ok_or(FieldError::new("total_sales", FieldProblem::TooLarge))
    }
}

/// Calculator template.
#[derive(Template, WebTemplate)]
#[template(path = "finance/profit_and_loss.html")]
pub struct ProfitAndLossTemplate {
    pub page: PageContext,
    pub form: ProfitAndLossForm,
    pub result: Option<ProfitAndLoss>,
}

/// Display the empty calculator.
pub async fn calculator(RequireAuth(_user): RequireAuth, page: PageContext) -> impl IntoResponse {
    ProfitAndLossTemplate {
        page,
        form: ProfitAndLossForm::default(),
        result: None,
    }
}

/// Compute `total_sales - total_costs`.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn calculate(
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Form(form): Form<ProfitAndLossForm>,
) -> Response {
    match form.calculate() {
        Ok(result) => {
            tracing::debug!(net = %result.net, outcome = result.label(), "Profit and loss computed");
            ProfitAndLossTemplate {
                page,
                form,
                result: Some(result),
            }
            .into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected calculator input");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                ProfitAndLossTemplate {
                    page: page.with_flash(Flash::danger(INVALID_FIGURES)),
                    form,
                    result: None,
                },
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn form(total_sales: &str, total_costs: &str) -> ProfitAndLossForm {
        ProfitAndLossForm {
            total_sales: total_sales.to_string(),
            total_costs: total_costs.to_string(),
        }
    }

    #[test]
    fn test_calculate() {
        assert_eq!(form("100", "60").calculate().unwrap().net, Decimal::from(40));
        assert_eq!(form("50", "80").calculate().unwrap().net, Decimal::from(-30));
    }

    #[test]
    fn test_calculate_rejects_text() {
        assert_eq!(form("lots", "60").calculate().unwrap_err().field, "total_sales");
        assert_eq!(form("100", "").calculate().unwrap_err().field, "total_costs");
    }

    #[test]
    fn test_calculate_rejects_huge_figures() {
        let err = form("79228162514264337593543950335", "-1").calculate().unwrap_err();
        assert_eq!(err.problem, FieldProblem::TooLarge);
        assert_eq!(
            form("999999999999999", "-999999999999999").calculate().unwrap().net,
            Decimal::from(1_999_999_999_999_998_i64)
        );
    }
}
