//! Domain models for the back office.
//!
//! Records are plain values; validation happens when a form is turned into a
//! record (see [`fields`]), so anything that reaches the store is well-formed.

pub mod employee;
pub mod fields;
pub mod product;
pub mod report;
pub mod sale;
pub mod session;
pub mod user;

pub use employee::Employee;
pub use fields::FieldError;
pub use product::Product;
pub use report::{ProductRevenue, ProfitAndLoss, SalesSummary, checked_total, saturating_total};
pub use sale::Sale;
pub use session::{CurrentUser, Flash, FlashKind, keys as session_keys};
pub use user::User;
