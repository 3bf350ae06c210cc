//! In-memory record store.
//!
//! # Collections
//!
//! - `users` - login accounts, keyed by username
//! - `products` - inventory, insertion order
//! - `sales` - sales records, insertion order
//! - `employees` - staff roster, insertion order
//!
//! Nothing is persisted; every record lives as long as the process. Each
//! collection has its own lock, so a slow reader of sales never blocks a
//! product write. Access goes through the per-entity repositories in the
//! submodules, which borrow the store the way a repository borrows a pool.

use std::collections::HashMap;

use tokio::sync::RwLock;

use bizdesk_core::Username;

use crate::models::{Employee, Product, Sale, User};

pub mod employees;
pub mod products;
pub mod sales;
pub mod users;

pub use employees::EmployeeRepository;
pub use products::ProductRepository;
pub use sales::SaleRepository;
pub use users::UserRepository;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A running total (inventory value, revenue, payroll) would overflow.
    #[error("{0} is too large")]
    TooLarge(&'static str),
}

/// Process-lifetime storage for every record the application keeps.
#[derive(Debug, Default)]
pub struct RecordStore {
    users: RwLock<HashMap<Username, User>>,
    products: RwLock<Vec<Product>>,
    sales: RwLock<Vec<Sale>>,
    employees: RwLock<Vec<Employee>>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository over user accounts.
    #[must_use]
    pub const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self)
    }

    /// Repository over inventory.
    #[must_use]
    pub const fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(self)
    }

    /// Repository over sales records.
    #[must_use]
    pub const fn sales(&self) -> SaleRepository<'_> {
        SaleRepository::new(self)
    }

    /// Repository over the staff roster.
    #[must_use]
    pub const fn employees(&self) -> EmployeeRepository<'_> {
        EmployeeRepository::new(self)
    }
}
