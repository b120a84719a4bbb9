//! Driving port for product mutations.
//!
//! Requests carry raw, possibly missing field values so that the service can
//! report every violated constraint in a single validation error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ProductId};

/// Transformed product representation returned by the driving ports and held
/// in the product cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub id: ProductId,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub store_id: String,
    pub category: String,
    pub stock: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a product. Every field except `description` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub store_id: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i64>,
}

/// Partial update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
}

/// Driving port for product write operations.
///
/// Every successful mutation removes the product's cache entry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCommand: Send + Sync {
    /// Validate and persist a new active product.
    ///
    /// Fails with a validation error listing every violated constraint.
    async fn create_product(&self, request: CreateProductRequest) -> Result<ProductPayload, Error>;

    /// Apply the present fields of `request` to an existing product, active
    /// or not.
    async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> Result<ProductPayload, Error>;

    /// Set the stock of an active product to `quantity`.
    async fn update_stock(&self, id: ProductId, quantity: i64) -> Result<(), Error>;

    /// Remove `quantity` units from a product's stock, active or not.
    ///
    /// Fails with an insufficient stock error, leaving stock unchanged, when
    /// fewer than `quantity` units are available.
    async fn reduce_stock(&self, id: ProductId, quantity: i64) -> Result<(), Error>;

    /// Soft-delete a product.
    async fn delete_product(&self, id: ProductId) -> Result<(), Error>;
}
