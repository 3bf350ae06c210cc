//! Employee roster record.

use rust_decimal::Decimal;
use serde::Serialize;

/// A member of staff. No identifier; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub name: String,
    pub department: String,
    pub designation: String,
    pub salary: Decimal,
}
