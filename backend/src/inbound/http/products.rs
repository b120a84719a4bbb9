//! Product HTTP handlers.
//!
//! ```text
//! POST   /api/v1/products
//! GET    /api/v1/products?page&size&sortBy&sortDirection
//! GET    /api/v1/products/search?title=
//! GET    /api/v1/products/price-range?min&max
//! GET    /api/v1/products/low-stock?threshold=
//! GET    /api/v1/products/store/{storeId}
//! GET    /api/v1/products/store/{storeId}/count
//! GET    /api/v1/products/category/{category}?page&size
//! GET    /api/v1/products/{id}
//! PUT    /api/v1/products/{id}
//! DELETE /api/v1/products/{id}
//! POST   /api/v1/products/{id}/stock?quantity=
//! POST   /api/v1/products/{id}/stock/reduce?quantity=
//! ```
//!
//! Literal segments are registered ahead of `{id}` so that, for example,
//! `/products/search` never reaches the id lookup.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest, PageRequestError, SortDirection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateProductRequest, ListProductsRequest, ProductCountByStore, ProductPayload,
    UpdateProductRequest,
};
use crate::domain::{Error, PriceRange, ProductId, ProductSort, ProductSortField};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::ProductPageSchema;
use crate::inbound::http::state::HttpState;

/// Product representation returned by every product endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(value_type = String, format = Uuid, example = "550e8400-e29b-41d4-a716-446655440000")]
    pub product_uuid: ProductId,
    #[schema(example = "iPhone 15 Pro")]
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 999.99)]
    pub price: Decimal,
    #[schema(example = "STORE-001")]
    pub store_id: String,
    #[schema(example = "Electronics")]
    pub category: String,
    #[schema(example = 50)]
    pub stock: i32,
    pub active: bool,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl From<ProductPayload> for ProductResponse {
    fn from(value: ProductPayload) -> Self {
        Self {
            product_uuid: value.id,
            title: value.title,
            description: value.description,
            price: value.price,
            store_id: value.store_id,
            category: value.category,
            stock: value.stock,
            active: value.active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

fn responses(payloads: Vec<ProductPayload>) -> Vec<ProductResponse> {
    payloads.into_iter().map(ProductResponse::from).collect()
}

/// Request payload for creating a product.
///
/// Fields are optional at the wire level so that every missing field is
/// reported in one validation error.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    #[schema(example = "iPhone 15 Pro")]
    pub title: Option<String>,
    #[schema(example = "Latest iPhone with advanced features")]
    pub description: Option<String>,
    #[schema(value_type = Option<f64>, example = 999.99)]
    pub price: Option<Decimal>,
    #[schema(example = "STORE-001")]
    pub store_id: Option<String>,
    #[schema(example = "Electronics")]
    pub category: Option<String>,
    #[schema(example = 50)]
    pub stock: Option<i64>,
}

impl From<CreateProductBody> for CreateProductRequest {
    fn from(value: CreateProductBody) -> Self {
        Self {
            title: value.title,
            description: value.description,
            price: value.price,
            store_id: value.store_id,
            category: value.category,
            stock: value.stock,
        }
    }
}

/// Partial update payload; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBody {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>, example = 899.99)]
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
}

impl From<UpdateProductBody> for UpdateProductRequest {
    fn from(value: UpdateProductBody) -> Self {
        Self {
            title: value.title,
            description: value.description,
            price: value.price,
            stock: value.stock,
        }
    }
}

/// Number of active products owned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreCountResponse {
    #[schema(example = "STORE-001")]
    pub store_id: String,
    #[schema(example = 12)]
    pub count: u64,
}

impl From<ProductCountByStore> for StoreCountResponse {
    fn from(value: ProductCountByStore) -> Self {
        Self {
            store_id: value.store_id,
            count: value.count,
        }
    }
}

/// Paging and ordering parameters for the full listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// Zero-based page index (default 0).
    pub page: Option<i64>,
    /// Page size (default 10).
    pub size: Option<i64>,
    /// Sort column (default `createdAt`).
    pub sort_by: Option<String>,
    /// `asc` or `desc`, case-insensitive (default `desc`).
    pub sort_direction: Option<String>,
}

/// Paging parameters for category listings.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index (default 0).
    pub page: Option<i64>,
    /// Page size (default 10).
    pub size: Option<i64>,
}

/// Title search parameter.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the title.
    pub title: String,
}

/// Inclusive price window.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRangeParams {
    /// Lower bound, inclusive.
    #[param(value_type = f64)]
    pub min: Decimal,
    /// Upper bound, inclusive.
    #[param(value_type = f64)]
    pub max: Decimal,
}

/// Stock threshold parameter.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockParams {
    /// Products with strictly fewer units are returned.
    pub threshold: i32,
}

/// Stock quantity parameter.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuantityParams {
    /// Number of units.
    pub quantity: i64,
}

fn parse_product_id(raw: &str) -> Result<ProductId, Error> {
    raw.parse()
        .map_err(|_| Error::validation([format!("Product id must be a UUID, got '{raw}'")]))
}

fn page_violation(error: PageRequestError) -> String {
    match error {
        PageRequestError::NegativePage => "Page number must not be negative".to_owned(),
        PageRequestError::NonPositiveSize => "Page size must be at least 1".to_owned(),
        PageRequestError::OffsetOverflow => "Page number is too large".to_owned(),
    }
}

fn parse_page(
    page: Option<i64>,
    size: Option<i64>,
    violations: &mut Vec<String>,
) -> Option<PageRequest> {
    PageRequest::new(page.unwrap_or(0), size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE)))
        .map_err(|err| violations.push(page_violation(err)))
        .ok()
}

fn parse_list_request(params: ListProductsParams) -> Result<ListProductsRequest, Error> {
    let mut violations = Vec::new();
    let page = parse_page(params.page, params.size, &mut violations);
    let field = match params.sort_by.as_deref() {
        None => Some(ProductSortField::default()),
        Some(raw) => raw
            .parse::<ProductSortField>()
            .map_err(|_| {
                violations.push(format!(
                    "sortBy must be one of: {}",
                    ProductSortField::KEYWORDS.join(", ")
                ));
            })
            .ok(),
    };
    let direction = match params.sort_direction.as_deref() {
        None => Some(SortDirection::default()),
        Some(raw) => raw
            .parse::<SortDirection>()
            .map_err(|_| violations.push("sortDirection must be asc or desc".to_owned()))
            .ok(),
    };

    match (page, field, direction) {
        (Some(page), Some(field), Some(direction)) => Ok(ListProductsRequest {
            page,
            sort: ProductSort::new(field, direction),
        }),
        _ => Err(Error::validation(violations)),
    }
}

fn parse_page_params(params: PageParams) -> Result<PageRequest, Error> {
    let mut violations = Vec::new();
    parse_page(params.page, params.size, &mut violations)
        .ok_or_else(|| Error::validation(violations))
}

/// Create a product. New products are always active.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductBody,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid input data", body = ErrorBody),
        (status = 503, description = "Service unavailable", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<CreateProductBody>,
) -> ApiResult<HttpResponse> {
    let created = state
        .products
        .create_product(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ProductResponse::from(created)))
}

/// Page through every product, active or not.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Page of products", body = ProductPageSchema),
        (status = 400, description = "Invalid paging or sort parameters", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    params: web::Query<ListProductsParams>,
) -> ApiResult<web::Json<Page<ProductResponse>>> {
    let request = parse_list_request(params.into_inner())?;
    let page = state.products_query.list_products(request).await?;
    Ok(web::Json(page.map(ProductResponse::from)))
}

/// Search active products by title, ignoring case.
#[utoipa::path(
    get,
    path = "/api/v1/products/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching active products", body = [ProductResponse]),
        (status = 400, description = "Missing title", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "searchProducts"
)]
#[get("/products/search")]
pub async fn search_products(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let found = state.products_query.search(&params.title).await?;
    Ok(web::Json(responses(found)))
}

/// Active products priced inside an inclusive window.
#[utoipa::path(
    get,
    path = "/api/v1/products/price-range",
    params(PriceRangeParams),
    responses(
        (status = 200, description = "Active products in the window", body = [ProductResponse]),
        (status = 400, description = "Invalid window", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "listProductsByPriceRange"
)]
#[get("/products/price-range")]
pub async fn list_by_price_range(
    state: web::Data<HttpState>,
    params: web::Query<PriceRangeParams>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let range = PriceRange::new(params.min, params.max)
        .map_err(|err| Error::validation([err.to_string()]))?;
    let found = state.products_query.list_by_price_range(range).await?;
    Ok(web::Json(responses(found)))
}

/// Active products with fewer units in stock than the threshold.
#[utoipa::path(
    get,
    path = "/api/v1/products/low-stock",
    params(LowStockParams),
    responses(
        (status = 200, description = "Active products below the threshold", body = [ProductResponse]),
        (status = 400, description = "Missing or invalid threshold", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "listLowStockProducts"
)]
#[get("/products/low-stock")]
pub async fn list_low_stock(
    state: web::Data<HttpState>,
    params: web::Query<LowStockParams>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let found = state.products_query.list_low_stock(params.threshold).await?;
    Ok(web::Json(responses(found)))
}

/// Active products owned by a store.
#[utoipa::path(
    get,
    path = "/api/v1/products/store/{storeId}",
    params(("storeId" = String, Path, description = "Store identifier")),
    responses((status = 200, description = "Active products of the store", body = [ProductResponse])),
    tags = ["products"],
    operation_id = "listProductsByStore"
)]
#[get("/products/store/{storeId}")]
pub async fn list_by_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ProductResponse>>> {
    let found = state.products_query.list_by_store(&path).await?;
    Ok(web::Json(responses(found)))
}

/// Count active products owned by a store.
#[utoipa::path(
    get,
    path = "/api/v1/products/store/{storeId}/count",
    params(("storeId" = String, Path, description = "Store identifier")),
    responses((status = 200, description = "Active product count", body = StoreCountResponse)),
    tags = ["products"],
    operation_id = "countProductsByStore"
)]
#[get("/products/store/{storeId}/count")]
pub async fn count_by_store(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StoreCountResponse>> {
    let counted = state.products_query.count_by_store(&path).await?;
    Ok(web::Json(counted.into()))
}

/// Page through active products in a category, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/products/category/{category}",
    params(("category" = String, Path, description = "Category name"), PageParams),
    responses(
        (status = 200, description = "Page of active products", body = ProductPageSchema),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "listProductsByCategory"
)]
#[get("/products/category/{category}")]
pub async fn list_by_category(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<Page<ProductResponse>>> {
    let page = parse_page_params(params.into_inner())?;
    let found = state.products_query.list_by_category(&path, page).await?;
    Ok(web::Json(found.map(ProductResponse::from)))
}

/// Fetch a product by id, including soft-deleted products.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Malformed product id", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id = parse_product_id(&path)?;
    let found = state.products_query.get_product(id).await?;
    Ok(web::Json(found.into()))
}

/// Apply a partial update to a product, active or not.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    request_body = UpdateProductBody,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid input data", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateProductBody>,
) -> ApiResult<web::Json<ProductResponse>> {
    let id = parse_product_id(&path)?;
    let updated = state
        .products
        .update_product(id, payload.into_inner().into())
        .await?;
    Ok(web::Json(updated.into()))
}

/// Soft-delete a product.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Malformed product id", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_product_id(&path)?;
    state.products.delete_product(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Set the stock of an active product.
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/stock",
    params(("id" = String, Path, description = "Product UUID"), QuantityParams),
    responses(
        (status = 200, description = "Stock updated"),
        (status = 400, description = "Invalid quantity", body = ErrorBody),
        (status = 404, description = "No active product with this id", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "updateProductStock"
)]
#[post("/products/{id}/stock")]
pub async fn update_stock(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<QuantityParams>,
) -> ApiResult<HttpResponse> {
    let id = parse_product_id(&path)?;
    state.products.update_stock(id, params.quantity).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Remove units from a product's stock.
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/stock/reduce",
    params(("id" = String, Path, description = "Product UUID"), QuantityParams),
    responses(
        (status = 200, description = "Stock reduced"),
        (status = 400, description = "Invalid quantity or insufficient stock", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody)
    ),
    tags = ["products"],
    operation_id = "reduceProductStock"
)]
#[post("/products/{id}/stock/reduce")]
pub async fn reduce_stock(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<QuantityParams>,
) -> ApiResult<HttpResponse> {
    let id = parse_product_id(&path)?;
    state.products.reduce_stock(id, params.quantity).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Register every product route, literal segments first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_product)
        .service(list_products)
        .service(search_products)
        .service(list_by_price_range)
        .service(list_low_stock)
        .service(count_by_store)
        .service(list_by_store)
        .service(list_by_category)
        .service(get_product)
        .service(update_product)
        .service(delete_product)
        .service(update_stock)
        .service(reduce_stock);
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
