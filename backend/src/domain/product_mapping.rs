//! Mapping between product entities and driving-port payloads.
//!
//! These functions are pure: identifiers and timestamps are supplied by the
//! caller so that the service owns every source of non-determinism.

use chrono::{DateTime, Utc};

use crate::domain::ports::{CreateProductRequest, ProductPayload, UpdateProductRequest};
use crate::domain::{
    Presence, Product, ProductChanges, ProductDraft, ProductId, ProductValidationError, Violations,
};

impl From<&Product> for ProductPayload {
    fn from(value: &Product) -> Self {
        Self {
            id: value.id(),
            title: value.title().to_owned(),
            description: value.description().map(str::to_owned),
            price: value.price(),
            store_id: value.store_id().to_owned(),
            category: value.category().to_owned(),
            stock: value.stock(),
            active: value.is_active(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

impl From<Product> for ProductPayload {
    fn from(value: Product) -> Self {
        Self::from(&value)
    }
}

/// Build a new active product from a creation request.
///
/// `created_at` and `updated_at` both take the value of `now`.
///
/// # Errors
///
/// Returns every violated constraint when the request is incomplete or
/// invalid.
pub fn product_from_request(
    request: CreateProductRequest,
    id: ProductId,
    now: DateTime<Utc>,
) -> Result<Product, ProductValidationError> {
    let mut violations = Violations::default();
    violations.check_title(request.title.as_deref(), Presence::Required);
    violations.check_description(request.description.as_deref());
    violations.check_price(request.price, Presence::Required);
    violations.check_store_id(request.store_id.as_deref());
    violations.check_category(request.category.as_deref());
    violations.check_stock(request.stock, Presence::Required);
    violations.finish()?;

    let CreateProductRequest {
        title,
        description,
        price,
        store_id,
        category,
        stock,
    } = request;

    Product::new(ProductDraft {
        id,
        title: title.unwrap_or_default(),
        description,
        price: price.unwrap_or_default(),
        store_id: store_id.unwrap_or_default(),
        category: category.unwrap_or_default(),
        stock: stock.and_then(|value| i32::try_from(value).ok()).unwrap_or_default(),
        active: true,
        created_at: now,
        updated_at: now,
    })
}

/// Convert a partial update request into validated changes.
///
/// # Errors
///
/// Returns every violated constraint among the present fields.
pub fn changes_from_request(
    request: UpdateProductRequest,
) -> Result<ProductChanges, ProductValidationError> {
    let mut violations = Violations::default();
    violations.check_title(request.title.as_deref(), Presence::Optional);
    violations.check_description(request.description.as_deref());
    violations.check_price(request.price, Presence::Optional);
    violations.check_stock(request.stock, Presence::Optional);
    violations.finish()?;

    Ok(ProductChanges {
        title: request.title,
        description: request.description,
        price: request.price,
        stock: request.stock.and_then(|value| i32::try_from(value).ok()),
    })
}
