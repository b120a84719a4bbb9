//! Port for product persistence.
//!
//! Active-only filtering is part of each method's contract: `list` and the
//! point lookups see every record, while the store, category, title, price,
//! stock-threshold and count queries only see active products.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{PriceRange, Product, ProductChanges, ProductId, ProductSort};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "product repository query failed: {message}",
    }
}

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockReduction {
    /// Stock was decremented; `remaining` units are left.
    Reduced { remaining: i32 },
    /// Stock was left unchanged because only `available` units exist.
    Insufficient { available: i32 },
    /// No product has the requested identifier.
    Missing,
}

/// Port for reading and mutating persisted products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product.
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Find a product by external id, active or not.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Whether an active product has the given external id.
    async fn exists_active(&self, id: &ProductId) -> Result<bool, ProductRepositoryError>;

    /// Page through every product, active or not, in the requested order.
    async fn list(
        &self,
        page: PageRequest,
        sort: ProductSort,
    ) -> Result<Page<Product>, ProductRepositoryError>;

    /// Active products owned by a store.
    async fn list_active_by_store(
        &self,
        store_id: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Page through active products in a category, newest first.
    async fn list_active_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<Product>, ProductRepositoryError>;

    /// Active products whose title contains `fragment`, ignoring case.
    ///
    /// The fragment is matched literally; `%` and `_` carry no wildcard
    /// meaning.
    async fn search_active_by_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Active products priced inside the inclusive window.
    async fn list_active_in_price_range(
        &self,
        range: PriceRange,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Active products with `stock < threshold`.
    async fn list_active_below_stock(
        &self,
        threshold: i32,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Number of active products owned by a store.
    async fn count_active_by_store(&self, store_id: &str) -> Result<u64, ProductRepositoryError>;

    /// Write the fields present in `changes` to a product, active or not.
    ///
    /// Absent fields and the active flag keep their stored values. Returns
    /// the product as stored after the write, or `None` when no row carries
    /// the id.
    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Set stock to an absolute quantity. Returns the number of rows changed.
    async fn set_stock(
        &self,
        id: &ProductId,
        quantity: i32,
        at: DateTime<Utc>,
    ) -> Result<u64, ProductRepositoryError>;

    /// Decrement stock by `quantity` only if at least that many units exist.
    ///
    /// The check and the decrement are a single atomic step.
    async fn reduce_stock(
        &self,
        id: &ProductId,
        quantity: i32,
        at: DateTime<Utc>,
    ) -> Result<StockReduction, ProductRepositoryError>;

    /// Mark a product inactive. Returns the number of rows changed.
    async fn deactivate(
        &self,
        id: &ProductId,
        at: DateTime<Utc>,
    ) -> Result<u64, ProductRepositoryError>;
}
