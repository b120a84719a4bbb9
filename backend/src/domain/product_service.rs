//! Product domain service.
//!
//! Implements the product driving ports on top of the repository and cache
//! ports. The service owns active/inactive semantics, stock arithmetic and
//! cache invalidation; adapters never decide either.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use crate::domain::ports::{
    CreateProductRequest, ListProductsRequest, ProductCache, ProductCacheKey, ProductCommand,
    ProductCountByStore, ProductPayload, ProductQuery, ProductRepository, ProductRepositoryError,
    StockReduction, UpdateProductRequest,
};
use crate::domain::product_mapping::{changes_from_request, product_from_request};
use crate::domain::{
    Error, Presence, PriceRange, Product, ProductId, ProductValidationError, Violations,
};

/// Rejection message for stock reductions of zero or fewer units.
pub const QUANTITY_TOO_LOW: &str = "Quantity must be at least 1";
/// Rejection message for stock reductions beyond the representable range.
pub const QUANTITY_TOO_HIGH: &str = "Quantity is too high";

fn map_repository_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("product repository unavailable: {message}"))
        }
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

fn map_validation_error(error: ProductValidationError) -> Error {
    Error::validation(error.into_violations())
}

fn product_not_found(id: ProductId) -> Error {
    Error::not_found(format!("Product not found with UUID: {id}"))
}

fn payloads(products: Vec<Product>) -> Vec<ProductPayload> {
    products.into_iter().map(ProductPayload::from).collect()
}

/// Product service implementing the command and query driving ports.
///
/// The cache may be a trait object so that the adapter can be chosen at
/// startup.
pub struct ProductService<R: ?Sized, C: ?Sized> {
    repository: Arc<R>,
    cache: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, C: ?Sized> Clone for ProductService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized, C: ?Sized> ProductService<R, C> {
    /// Create a new service over the product repository and cache.
    pub fn new(repository: Arc<R>, cache: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            cache,
            clock,
        }
    }
}

impl<R, C> ProductService<R, C>
where
    R: ProductRepository + ?Sized,
    C: ProductCache + ?Sized,
{
    async fn cached(&self, key: &ProductCacheKey) -> Option<ProductPayload> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(error) => {
                warn!(%error, %key, "product cache read failed; falling back to repository");
                None
            }
        }
    }

    async fn remember(&self, key: &ProductCacheKey, payload: &ProductPayload) {
        if let Err(error) = self.cache.put(key, payload).await {
            warn!(%error, %key, "product cache write failed");
        }
    }

    async fn evict(&self, id: ProductId) {
        let key = ProductCacheKey::for_product(&id);
        if let Err(error) = self.cache.invalidate(&key).await {
            warn!(%error, %key, "product cache invalidation failed");
        }
    }

    async fn load(&self, id: ProductId) -> Result<Product, Error> {
        self.repository
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| product_not_found(id))
    }
}

#[async_trait]
impl<R, C> ProductCommand for ProductService<R, C>
where
    R: ProductRepository + ?Sized,
    C: ProductCache + ?Sized,
{
    async fn create_product(&self, request: CreateProductRequest) -> Result<ProductPayload, Error> {
        info!(title = ?request.title, "creating product");

        let product = product_from_request(request, ProductId::random(), self.clock.utc())
            .map_err(map_validation_error)?;
        self.repository
            .insert(&product)
            .await
            .map_err(map_repository_error)?;

        info!(product_id = %product.id(), "product created");
        Ok(ProductPayload::from(product))
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> Result<ProductPayload, Error> {
        info!(product_id = %id, "updating product");

        let changes = changes_from_request(request).map_err(map_validation_error)?;

        let product = self
            .repository
            .update(&id, &changes, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| product_not_found(id))?;
        self.evict(id).await;

        info!(product_id = %id, "product updated");
        Ok(ProductPayload::from(product))
    }

    async fn update_stock(&self, id: ProductId, quantity: i64) -> Result<(), Error> {
        info!(product_id = %id, quantity, "updating stock");

        let mut violations = Violations::default();
        violations.check_stock(Some(quantity), Presence::Required);
        violations.finish().map_err(map_validation_error)?;
        let quantity = i32::try_from(quantity).map_err(|_| Error::validation([QUANTITY_TOO_HIGH]))?;

        let active = self
            .repository
            .exists_active(&id)
            .await
            .map_err(map_repository_error)?;
        if !active {
            return Err(product_not_found(id));
        }

        // A concurrent delete between the check and the write is reported as
        // not found rather than prevented.
        let changed = self
            .repository
            .set_stock(&id, quantity, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        if changed == 0 {
            return Err(Error::not_found(format!(
                "Failed to update stock for product UUID: {id}"
            )));
        }
        self.evict(id).await;

        info!(product_id = %id, quantity, "stock updated");
        Ok(())
    }

    async fn reduce_stock(&self, id: ProductId, quantity: i64) -> Result<(), Error> {
        info!(product_id = %id, quantity, "reducing stock");

        if quantity < 1 {
            return Err(Error::validation([QUANTITY_TOO_LOW]));
        }
        let quantity = i32::try_from(quantity).map_err(|_| Error::validation([QUANTITY_TOO_HIGH]))?;

        let outcome = self
            .repository
            .reduce_stock(&id, quantity, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        match outcome {
            StockReduction::Reduced { remaining } => {
                self.evict(id).await;
                info!(product_id = %id, remaining, "stock reduced");
                Ok(())
            }
            StockReduction::Insufficient { available } => {
                Err(Error::insufficient_stock(available, quantity))
            }
            StockReduction::Missing => Err(product_not_found(id)),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), Error> {
        info!(product_id = %id, "deleting product");

        let changed = self
            .repository
            .deactivate(&id, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        if changed == 0 {
            return Err(product_not_found(id));
        }
        self.evict(id).await;

        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, C> ProductQuery for ProductService<R, C>
where
    R: ProductRepository + ?Sized,
    C: ProductCache + ?Sized,
{
    async fn get_product(&self, id: ProductId) -> Result<ProductPayload, Error> {
        info!(product_id = %id, "fetching product");

        let key = ProductCacheKey::for_product(&id);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let payload = ProductPayload::from(self.load(id).await?);
        self.remember(&key, &payload).await;
        Ok(payload)
    }

    async fn list_products(
        &self,
        request: ListProductsRequest,
    ) -> Result<Page<ProductPayload>, Error> {
        let ListProductsRequest { page, sort } = request;
        info!(
            page = page.page(),
            size = page.size(),
            sort_by = %sort.field,
            direction = %sort.direction,
            "listing products"
        );

        let products = self
            .repository
            .list(page, sort)
            .await
            .map_err(map_repository_error)?;
        Ok(products.map(ProductPayload::from))
    }

    async fn list_by_store(&self, store_id: &str) -> Result<Vec<ProductPayload>, Error> {
        info!(store_id, "listing products for store");

        self.repository
            .list_active_by_store(store_id)
            .await
            .map(payloads)
            .map_err(map_repository_error)
    }

    async fn list_by_category(
        &self,
        category: &str,
        page: PageRequest,
    ) -> Result<Page<ProductPayload>, Error> {
        info!(category, page = page.page(), size = page.size(), "listing products in category");

        let products = self
            .repository
            .list_active_by_category(category, page)
            .await
            .map_err(map_repository_error)?;
        Ok(products.map(ProductPayload::from))
    }

    async fn search(&self, title: &str) -> Result<Vec<ProductPayload>, Error> {
        info!(title, "searching products by title");

        self.repository
            .search_active_by_title(title)
            .await
            .map(payloads)
            .map_err(map_repository_error)
    }

    async fn list_by_price_range(&self, range: PriceRange) -> Result<Vec<ProductPayload>, Error> {
        info!(min = %range.min(), max = %range.max(), "listing products in price range");

        self.repository
            .list_active_in_price_range(range)
            .await
            .map(payloads)
            .map_err(map_repository_error)
    }

    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<ProductPayload>, Error> {
        info!(threshold, "listing low stock products");

        self.repository
            .list_active_below_stock(threshold)
            .await
            .map(payloads)
            .map_err(map_repository_error)
    }

    async fn count_by_store(&self, store_id: &str) -> Result<ProductCountByStore, Error> {
        info!(store_id, "counting products for store");

        let count = self
            .repository
            .count_active_by_store(store_id)
            .await
            .map_err(map_repository_error)?;
        Ok(ProductCountByStore {
            store_id: store_id.to_owned(),
            count,
        })
    }
}

#[cfg(test)]
#[path = "product_service_tests.rs"]
mod tests;
