//! Inventory product record.

use rust_decimal::Decimal;
use serde::Serialize;

/// A product on the shelf.
///
/// Products have no identifier beyond their name, and duplicate names are
/// allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    /// Unit price.
    pub price: Decimal,
    /// Units in stock.
    pub stock: u32,
}

impl Product {
    /// Whether the stock level is strictly below `threshold`.
    #[must_use]
    pub const fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock < threshold
    }

    /// Price times units in stock, or `None` if it does not fit.
    #[must_use]
    pub fn checked_stock_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.stock))
    }

    /// Price times units in stock, clamped at `Decimal::MAX`.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.stock))
    }
}
