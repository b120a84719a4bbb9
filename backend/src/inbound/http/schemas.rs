//! OpenAPI schema definitions for domain and pagination types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`, and the
//! `pagination` crate carries no OpenAPI dependency. This module provides the
//! schema definitions required for OpenAPI documentation using utoipa's
//! external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding types but
//! live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

use crate::inbound::http::products::ProductResponse;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// No product carries the requested identifier.
    #[schema(rename = "PRODUCT_NOT_FOUND")]
    ProductNotFound,
    /// A stock reduction asked for more units than are available.
    #[schema(rename = "INSUFFICIENT_STOCK")]
    InsufficientStock,
    /// The request is malformed or fails validation.
    #[schema(rename = "VALIDATION_ERROR")]
    ValidationError,
    /// A backing service is unavailable.
    #[schema(rename = "SERVICE_UNAVAILABLE")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "INTERNAL_SERVER_ERROR")]
    InternalServerError,
}

/// OpenAPI schema for a [`pagination::Page`] of products.
#[derive(ToSchema)]
#[schema(as = ProductPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProductPageSchema {
    /// Products on this page.
    content: Vec<ProductResponse>,
    /// Zero-based page index.
    #[schema(example = 0)]
    page: u32,
    /// Requested page size.
    #[schema(example = 10)]
    size: u32,
    /// Number of products across all pages.
    #[schema(rename = "totalElements", example = 42)]
    total_elements: u64,
    /// Number of pages needed to hold every product.
    #[schema(rename = "totalPages", example = 5)]
    total_pages: u64,
    /// Whether this is the first page.
    first: bool,
    /// Whether no page follows this one.
    last: bool,
}
