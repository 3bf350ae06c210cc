//! Sales record repository.

use std::iter;

use super::{RecordStore, RepositoryError};
use crate::models::{Sale, SalesSummary, checked_total};

/// Repository for sales records.
pub struct SaleRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Append a sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::TooLarge` if total revenue would no longer
    /// fit in a `Decimal`. Nothing is stored in that case.
    pub async fn create(&self, sale: Sale) -> Result<(), RepositoryError> {
        let mut sales = self.store.sales.write().await;
        let revenue = checked_total(
            sales
                .iter()
                .map(|s| s.total_amount)
                .chain(iter::once(sale.total_amount)),
        );
        if revenue.is_none() {
            return Err(RepositoryError::TooLarge("revenue"));
        }
        sales.push(sale);
        Ok(())
    }

    /// All sales in insertion order.
    pub async fn list(&self) -> Vec<Sale> {
        self.store.sales.read().await.clone()
    }

    /// Number of sales.
    pub async fn count(&self) -> usize {
        self.store.sales.read().await.len()
    }

    /// Totals over every recorded sale.
    pub async fn summary(&self) -> SalesSummary {
        SalesSummary::from_sales(&self.store.sales.read().await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn sale(total_amount: Decimal) -> Sale {
        Sale {
            product_name: "Widget".to_string(),
            salesperson_id: "S-7".to_string(),
            customer_id: "C-42".to_string(),
            sale_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            quantity: 4,
            total_amount,
        }
    }

    #[tokio::test]
    async fn test_create_list_and_summary() {
        let store = RecordStore::new();
        let repo = store.sales();
        repo.create(sale(Decimal::new(1000, 2))).await.unwrap();

        let sales = repo.list().await;
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].customer_id, "C-42");

        let summary = repo.summary().await;
        assert_eq!(summary.units, 4);
        assert_eq!(summary.revenue, Decimal::from(10));
    }

    #[tokio::test]
    async fn test_create_rejects_overflowing_revenue() {
        let store = RecordStore::new();
        let repo = store.sales();
        repo.create(sale(Decimal::MAX)).await.unwrap();

        let err = repo.create(sale(Decimal::ONE)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::TooLarge("revenue")));
        assert_eq!(repo.count().await, 1);
        assert_eq!(repo.summary().await.revenue, Decimal::MAX);
    }
}
