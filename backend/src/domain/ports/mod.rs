//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod product_cache;
mod product_cache_key;
mod product_command;
mod product_query;
mod product_repository;

pub use product_cache::{NoOpProductCache, ProductCache, ProductCacheError};
pub use product_cache_key::{
    PRODUCT_CACHE_NAMESPACE, ProductCacheKey, ProductCacheKeyValidationError,
};
pub use product_command::{
    CreateProductRequest, ProductCommand, ProductPayload, UpdateProductRequest,
};
pub use product_query::{ListProductsRequest, ProductCountByStore, ProductQuery};
pub use product_repository::{ProductRepository, ProductRepositoryError, StockReduction};

#[cfg(test)]
pub use product_cache::MockProductCache;
#[cfg(test)]
pub use product_command::MockProductCommand;
#[cfg(test)]
pub use product_query::MockProductQuery;
#[cfg(test)]
pub use product_repository::MockProductRepository;
