//! Driving port for product read operations.
//!
//! Only [`ProductQuery::get_product`] and [`ProductQuery::list_products`] see
//! soft-deleted products; every other read is restricted to active ones.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, PriceRange, ProductId, ProductSort};

use super::ProductPayload;

/// Request for one page of the full product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListProductsRequest {
    pub page: PageRequest,
    pub sort: ProductSort,
}

/// Number of active products owned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCountByStore {
    pub store_id: String,
    pub count: u64,
}

/// Driving port for product read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductQuery: Send + Sync {
    /// Fetch one product by external id, including inactive products.
    async fn get_product(&self, id: ProductId) -> Result<ProductPayload, Error>;

    /// Page through all products, active and inactive.
    async fn list_products(
        &self,
        request: ListProductsRequest,
    ) -> Result<Page<ProductPayload>, Error>;

    /// Active products owned by a store.
    async fn list_by_store(&self, store_id: &str) -> Result<Vec<ProductPayload>, Error>;

    /// Page through active products in a category.
    async fn list_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<ProductPayload>, Error>;

    /// Active products whose title contains `title`, ignoring case.
    async fn search(&self, title: &str) -> Result<Vec<ProductPayload>, Error>;

    /// Active products priced inside the inclusive window.
    async fn list_by_price_range(&self, range: PriceRange) -> Result<Vec<ProductPayload>, Error>;

    /// Active products with fewer than `threshold` units in stock.
    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<ProductPayload>, Error>;

    /// Count of active products owned by a store.
    async fn count_by_store(&self, store_id: &str) -> Result<ProductCountByStore, Error>;
}
