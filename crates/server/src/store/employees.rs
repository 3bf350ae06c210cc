//! Staff roster repository.

use std::iter;

use rust_decimal::Decimal;

use super::{RecordStore, RepositoryError};
use crate::models::{Employee, checked_total, saturating_total};

/// Repository for the staff roster.
pub struct EmployeeRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> EmployeeRepository<'a> {
    /// Create a new employee repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Append an employee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::TooLarge` if the payroll would no longer fit
    /// in a `Decimal`. Nothing is stored in that case.
    pub async fn create(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut employees = self.store.employees.write().await;
        let payroll = checked_total(
            employees
                .iter()
                .map(|e| e.salary)
                .chain(iter::once(employee.salary)),
        );
        if payroll.is_none() {
            return Err(RepositoryError::TooLarge("payroll"));
        }
        employees.push(employee);
        Ok(())
    }

    /// The roster in insertion order.
    pub async fn list(&self) -> Vec<Employee> {
        self.store.employees.read().await.clone()
    }

    /// Number of employees.
    pub async fn count(&self) -> usize {
        self.store.employees.read().await.len()
    }

    /// Sum of all salaries.
    pub async fn payroll(&self) -> Decimal {
        saturating_total(self.store.employees.read().await.iter().map(|e| e.salary))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn employee(name: &str, salary: Decimal) -> Employee {
        Employee {
            name: name.to_string(),
            department: "Sales".to_string(),
            designation: "Associate".to_string(),
            salary,
        }
    }

    #[tokio::test]
    async fn test_roster_and_payroll() {
        let store = RecordStore::new();
        let repo = store.employees();
        for (name, salary) in [("Ana", 3000), ("Ben", 2500)] {
            repo.create(employee(name, Decimal::from(salary))).await.unwrap();
        }

        let roster = repo.list().await;
        assert_eq!(roster[0].name, "Ana");
        assert_eq!(roster[1].name, "Ben");
        assert_eq!(repo.count().await, 2);
        assert_eq!(repo.payroll().await, Decimal::from(5500));
    }

    #[tokio::test]
    async fn test_create_rejects_overflowing_payroll() {
        let store = RecordStore::new();
        let repo = store.employees();
        repo.create(employee("Ana", Decimal::MAX)).await.unwrap();

        assert!(matches!(
            repo.create(employee("Ben", Decimal::ONE)).await,
            Err(RepositoryError::TooLarge("payroll"))
        ));
        assert_eq!(repo.count().await, 1);
    }
}
