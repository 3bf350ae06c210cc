//! Inventory repository.

use std::iter;

use rust_decimal::Decimal;

use super::{RecordStore, RepositoryError};
use crate::models::{Product, checked_total, saturating_total};

/// Repository for inventory records.
pub struct ProductRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Append a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::TooLarge` if the inventory value would no
    /// longer fit in a `Decimal`. Nothing is stored in that case.
    pub async fn create(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.store.products.write().await;
        let total = products
            .iter()
            .chain(iter::once(&product))
            .map(Product::checked_stock_value)
            .collect::<Option<Vec<_>>>()
            .and_then(checked_total);
        if total.is_none() {
            return Err(RepositoryError::TooLarge("inventory value"));
        }
        products.push(product);
        Ok(())
    }

    /// All products in insertion order.
    pub async fn list(&self) -> Vec<Product> {
        self.store.products.read().await.clone()
    }

    /// Products matching `predicate`, in insertion order.
    pub async fn scan<F>(&self, predicate: F) -> Vec<Product>
    where
        F: Fn(&Product) -> bool,
    {
        self.store
            .products
            .read()
            .await
            .iter()
            .filter(|p| predicate(p))
            .cloned()
            .collect()
    }

    /// Products whose stock is strictly below `threshold`.
    pub async fn low_stock(&self, threshold: u32) -> Vec<Product> {
        self.scan(|p| p.is_low_stock(threshold)).await
    }

    /// Number of products.
    pub async fn count(&self) -> usize {
        self.store.products.read().await.len()
    }

    /// Sum of price times stock across the inventory.
    pub async fn stock_value(&self) -> Decimal {
        saturating_total(self.store.products.read().await.iter().map(Product::stock_value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(name: &str, stock: u32) -> Product {
        Product {
            name: name.to_string(),
            category: "General".to_string(),
            price: Decimal::from(2),
            stock,
        }
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = RecordStore::new();
        let repo = store.products();
        repo.create(product("b", 1)).await.unwrap();
        repo.create(product("a", 2)).await.unwrap();
        repo.create(product("b", 3)).await.unwrap();

        let names: Vec<String> = repo.list().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["b", "a", "b"]);
        assert_eq!(repo.count().await, 3);
    }

    #[tokio::test]
    async fn test_low_stock_threshold_is_strict() {
        let store = RecordStore::new();
        let repo = store.products();
        repo.create(product("Widget", 3)).await.unwrap();
        repo.create(product("Gadget", 10)).await.unwrap();

        let low = repo.low_stock(5).await;
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Widget");

        assert!(repo.low_stock(3).await.is_empty());
        assert_eq!(repo.low_stock(11).await.len(), 2);
    }

    #[tokio::test]
    async fn test_stock_value() {
        let store = RecordStore::new();
        let repo = store.products();
        assert_eq!(repo.stock_value().await, Decimal::ZERO);

        repo.create(product("Widget", 3)).await.unwrap();
        repo.create(product("Gadget", 10)).await.unwrap();
        assert_eq!(repo.stock_value().await, Decimal::from(26));
    }

    #[tokio::test]
    async fn test_create_rejects_overflowing_inventory_value() {
        let store = RecordStore::new();
        let repo = store.products();
        repo.create(product("Widget", 3)).await.unwrap();

        let mut huge = product("Crate", 2);
        huge.price = Decimal::MAX;
        let err = repo.create(huge).await.unwrap_err();
        assert!(matches!(err, RepositoryError::TooLarge(_)));

        let mut big = product("Pallet", 1);
        big.price = Decimal::MAX - Decimal::from(3);
        assert!(matches!(
            repo.create(big).await,
            Err(RepositoryError::TooLarge(_))
        ));

        assert_eq!(repo.count().await, 1);
        assert_eq!(repo.stock_value().await, Decimal::from(6));
    }
}
