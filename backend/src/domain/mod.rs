//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed product entities, the ports the service
//! depends on, and the service that implements the driving ports. Types are
//! immutable once validated; serialisation contracts (serde) are documented
//! on each type.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Product (alias to `product::Product`): validated catalogue record.
//! - ProductService: command and query service over the product ports.

pub mod error;
pub mod ports;
pub mod product;
pub mod product_listing;
pub mod product_mapping;
pub mod product_service;

pub use self::error::{Error, ErrorCode, VALIDATION_MESSAGE};
pub(crate) use self::product::{Presence, Violations};
pub use self::product::{
    DESCRIPTION_MAX_CHARS, PRICE_MAX, PRICE_MIN, PRICE_SCALE, Product, ProductChanges,
    ProductDraft, ProductId, ProductValidationError, STOCK_MAX, STOCK_MIN, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS, messages,
};
pub use self::product_listing::{
    PriceRange, PriceRangeError, ProductSort, ProductSortField, ProductSortFieldParseError,
};
pub use self::product_service::{ProductService, QUANTITY_TOO_HIGH, QUANTITY_TOO_LOW};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use product_service::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("Product not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
