//! Derived figures: the profit/loss calculator and sales summaries.
//!
//! Nothing here is stored; every value is recomputed from its inputs.
//!
//! Sums go through [`checked_total`] when a write must prove its total still
//! fits, and [`saturating_total`] when rendering. The repositories refuse any
//! record whose running total would overflow, so rendering never saturates.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::Sale;

/// Whether a net figure is a gain, a loss or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Profit,
    Loss,
    BreakEven,
}

/// Result of the profit and loss calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfitAndLoss {
    pub total_sales: Decimal,
    pub total_costs: Decimal,
    /// `total_sales - total_costs`.
    pub net: Decimal,
}

impl ProfitAndLoss {
    /// `None` when the difference does not fit in a `Decimal`.
    #[must_use]
    pub fn compute(total_sales: Decimal, total_costs: Decimal) -> Option<Self> {
        Some(Self {
            total_sales,
            total_costs,
            net: total_sales.checked_sub(total_costs)?,
        })
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.net.is_zero() {
            Outcome::BreakEven
        } else if self.net.is_sign_negative() {
            Outcome::Loss
        } else {
            Outcome::Profit
        }
    }

    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.outcome() == Outcome::Loss
    }

    /// Label shown next to the net figure.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.outcome() {
            Outcome::Profit => "Profit",
            Outcome::Loss => "Loss",
            Outcome::BreakEven => "Break-even",
        }
    }
}

/// Revenue attributed to one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRevenue {
    pub product_name: String,
    pub units: u64,
    pub revenue: Decimal,
}

/// Totals over a list of sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct SalesSummary {
    pub sales: usize,
    pub units: u64,
    pub revenue: Decimal,
    /// Per-product totals, highest revenue first (ties by name).
    pub by_product: Vec<ProductRevenue>,
}

impl SalesSummary {
    #[must_use]
    pub fn from_sales(sales: &[Sale]) -> Self {
        let mut by_name: HashMap<&str, (u64, Decimal)> = HashMap::new();
        for sale in sales {
            let entry = by_name
                .entry(sale.product_name.as_str())
                .or_insert((0, Decimal::ZERO));
            entry.0 = entry.0.saturating_add(u64::from(sale.quantity));
            entry.1 = entry.1.saturating_add(sale.total_amount);
        }

        let mut by_product: Vec<ProductRevenue> = by_name
            .into_iter()
            .map(|(name, (units, revenue))| ProductRevenue {
                product_name: name.to_owned(),
                units,
                revenue,
            })
            .collect();
        by_product.sort_by(|a, b| {
            b.revenue
                .cmp(&a.revenue)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });

        Self {
            sales: sales.len(),
            units: by_product
                .iter()
                .fold(0_u64, |acc, p| acc.saturating_add(p.units)),
            revenue: saturating_total(by_product.iter().map(|p| p.revenue)),
            by_product,
        }
    }
}

/// Sum of `values`, or `None` on overflow.
#[must_use]
pub fn checked_total<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Sum of `values`, clamped at the `Decimal` bounds.
#[must_use]
pub fn saturating_total<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_profit() {
        let pl = ProfitAndLoss::compute(Decimal::from(100), Decimal::from(60)).unwrap();
        assert_eq!(pl.net, Decimal::from(40));
        assert_eq!(pl.outcome(), Outcome::Profit);
    }

    #[test]
    fn test_loss() {
        let pl = ProfitAndLoss::compute(Decimal::from(50), Decimal::from(80)).unwrap();
        assert_eq!(pl.net, Decimal::from(-30));
        assert!(pl.is_loss());
        assert_eq!(pl.label(), "Loss");
    }

    #[test]
    fn test_break_even() {
        let pl = ProfitAndLoss::compute(Decimal::new(1050, 2), Decimal::new(105, 1)).unwrap();
        assert_eq!(pl.outcome(), Outcome::BreakEven);
    }

    #[test]
    fn test_compute_overflow_is_none() {
        assert!(ProfitAndLoss::compute(Decimal::MAX, Decimal::NEGATIVE_ONE).is_none());
    }

    #[test]
    fn test_totals() {
        let values = [Decimal::from(2), Decimal::new(5, 1)];
        assert_eq!(checked_total(values), Some(Decimal::new(25, 1)));
        assert_eq!(checked_total([Decimal::MAX, Decimal::ONE]), None);
        assert_eq!(saturating_total([Decimal::MAX, Decimal::ONE]), Decimal::MAX);
        assert_eq!(saturating_total([]), Decimal::ZERO);
    }

    #[test]
    fn test_sales_summary_does_not_panic_on_huge_totals() {
        let mut huge = sale("Widget", 1, 0);
        huge.total_amount = Decimal::MAX;
        let summary = SalesSummary::from_sales(&[huge.clone(), huge]);
        assert_eq!(summary.revenue, Decimal::MAX);
    }

    fn sale(product: &str, quantity: u32, total: i64) -> Sale {
        Sale {
            product_name: product.to_string(),
            salesperson_id: "S1".to_string(),
            customer_id: "C1".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            quantity,
            total_amount: Decimal::from(total),
        }
    }

    #[test]
    fn test_sales_summary_groups_and_orders_by_revenue() {
        let sales = vec![
            sale("Widget", 2, 20),
            sale("Gadget", 1, 50),
            sale("Widget", 3, 40),
            sale("Bolt", 10, 50),
        ];

        let summary = SalesSummary::from_sales(&sales);
        assert_eq!(summary.sales, 4);
        assert_eq!(summary.units, 16);
        assert_eq!(summary.revenue, Decimal::from(160));

        let names: Vec<&str> = summary
            .by_product
            .iter()
            .map(|p| p.product_name.as_str())
            .collect();
        assert_eq!(names, ["Widget", "Bolt", "Gadget"]);
        assert_eq!(summary.by_product.first().unwrap().units, 5);
    }

    #[test]
    fn test_sales_summary_empty() {
        assert_eq!(SalesSummary::from_sales(&[]), SalesSummary::default());
    }
}
