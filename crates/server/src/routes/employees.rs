//! Staff roster route handlers.

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
use crate::models::{Employee, FieldError, Flash, fields};
use crate::state::AppState;

/// New employee form data, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub name: String,
    pub department: String,
    pub designation: String,
    pub salary: String,
}

impl EmployeeForm {
    /// Validate every field and build the record.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError`] found.
    pub fn to_employee(&self) -> std::result::Result<Employee, FieldError> {
        Ok(Employee {
            name: fields::required_text("name", &self.name)?,
            department: fields::required_text("department", &self.department)?,
            designation: fields::required_text("designation", &self.designation)?,
            salary: fields::amount("salary", &self.salary)?,
        })
    }
}

/// Roster template.
#[derive(Template, WebTemplate)]
#[template(path = "employees/index.html")]
pub struct EmployeesTemplate {
    pub page: PageContext,
    pub employees: Vec<Employee>,
    pub payroll: Decimal,
}

/// New employee form template.
#[derive(Template, WebTemplate)]
#[template(path = "employees/new.html")]
pub struct NewEmployeeTemplate {
    pub page: PageContext,
    pub form: EmployeeForm,
}

/// List the roster in the order employees were added.
#[instrument(skip_all, fields(user = %user.username))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> impl IntoResponse {
    let repo = state.store().employees();
    EmployeesTemplate {
        page,
        employees: repo.list().await,
        payroll: repo.payroll().await,
    }
}

/// Display the new employee form.
pub async fn new(RequireAuth(_user): RequireAuth, page: PageContext) -> impl IntoResponse {
    NewEmployeeTemplate {
        page,
        form: EmployeeForm::default(),
    }
}

/// Handle new employee submission.
#[instrument(skip_all, fields(user = %user.username, name = %form.name.trim()))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Form(form): Form<EmployeeForm>,
) -> Result<Response> {
    let employee = match form.to_employee() {
        Ok(employee) => employee,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected employee form");
            return Ok(rejected(page, form, &e));
        }
    };

    if let Err(e) = state.store().employees().create(employee.clone()).await {
        tracing::warn!(error = %e, "Rejected employee: running total would overflow");
        return Ok(rejected(
            page,
            form,
            &FieldError::new("salary", FieldProblem::TooLarge),
        ));
    }

    tracing::info!(
        department = %employee.department,
        designation = %employee.designation,
        "Employee added"
    );
    add_breadcrumb(
        "staff",
        "Employee added",
        Some(&[("department", employee.department.as_str())]),
    );

    push_flash(&session, Flash::success("Employee added successfully!")).await?;
    Ok(Redirect::to("/view_employees").into_response())
}

/// Re-render the form with a validation notice.
fn rejected(page: PageContext, form: EmployeeForm, err: &FieldError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        NewEmployeeTemplate {
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

    #[test]
    fn test_to_employee() {
        let form = EmployeeForm {
            name: "Ana".to_string(),
            department: "Sales".to_string(),
            designation: "Lead".to_string(),
            salary: "4200.50".to_string(),
        };
        assert_eq!(form.to_employee().unwrap().salary, Decimal::new(420_050, 2));
    }

    #[test]
    fn test_negative_salary_rejected() {
        let form = EmployeeForm {
            name: "Ana".to_string(),
            department: "Sales".to_string(),
            designation: "Lead".to_string(),
            salary: "-1".to_string(),
        };
        assert_eq!(form.to_employee().unwrap_err().field, "salary");
    }
}
