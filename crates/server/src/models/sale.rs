//! Sales record.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One recorded sale.
///
/// `product_name` is free text; it is not checked against the product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    pub product_name: String,
    pub salesperson_id: String,
    pub customer_id: String,
    pub sale_date: NaiveDate,
    pub quantity: u32,
    pub total_amount: Decimal,
}
