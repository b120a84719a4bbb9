//! Port for caching product representations by external id.
use async_trait::async_trait;

use super::{ProductCacheKey, ProductPayload, define_port_error};

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum ProductCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "product cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } => "product cache serialisation failed: {message}",
    }
}

/// Read-through cache for single-product lookups.
///
/// Entries are only written on a lookup miss and are removed after every
/// mutation of the same product.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCache: Send + Sync {
    /// Read a cached product for the given key.
    async fn get(&self, key: &ProductCacheKey) -> Result<Option<ProductPayload>, ProductCacheError>;

    /// Store a product under the supplied key.
    async fn put(
        &self,
        key: &ProductCacheKey,
        product: &ProductPayload,
    ) -> Result<(), ProductCacheError>;

    /// Drop any entry stored under the key.
    async fn invalidate(&self, key: &ProductCacheKey) -> Result<(), ProductCacheError>;
}

/// Cache that stores nothing, for deployments and tests without caching.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProductCache;

#[async_trait]
impl ProductCache for NoOpProductCache {
    async fn get(
        &self,
        _key: &ProductCacheKey,
    ) -> Result<Option<ProductPayload>, ProductCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &ProductCacheKey,
        _product: &ProductPayload,
    ) -> Result<(), ProductCacheError> {
        Ok(())
    }

    async fn invalidate(&self, _key: &ProductCacheKey) -> Result<(), ProductCacheError> {
        Ok(())
    }
}
