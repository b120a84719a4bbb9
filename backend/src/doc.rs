//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every product endpoint, the service probes, and the
//! wire schemas they exchange. Domain types stay free of utoipa derives; the
//! inbound layer supplies schema wrappers for them.
//!
//! The document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::tag::Tag;
use utoipa::{Modify, OpenApi};

use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::info::ServiceInfo;
use crate::inbound::http::products::{
    CreateProductBody, ProductResponse, StoreCountResponse, UpdateProductBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ProductPageSchema};
use crate::middleware::TRACE_ID_HEADER;

/// Describe the trace id header carried by every response.
struct TraceHeaderAddon;

impl Modify for TraceHeaderAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let tags = openapi.tags.get_or_insert_with(Vec::new);
        if let Some(tag) = tags.iter_mut().find(|tag| tag.name == "products") {
            tag.description = Some(format!(
                "Product catalogue management. Every response carries a `{TRACE_ID_HEADER}` header."
            ));
        } else {
            tags.push(Tag::new("products"));
        }
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&TraceHeaderAddon),
    info(
        title = "Product Service API",
        description = "Product catalogue management: CRUD, search, and stock control.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::search_products,
        crate::inbound::http::products::list_by_price_range,
        crate::inbound::http::products::list_low_stock,
        crate::inbound::http::products::list_by_store,
        crate::inbound::http::products::count_by_store,
        crate::inbound::http::products::list_by_category,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::products::update_stock,
        crate::inbound::http::products::reduce_stock,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::info::info,
    ),
    components(schemas(
        ProductResponse,
        CreateProductBody,
        UpdateProductBody,
        StoreCountResponse,
        ProductPageSchema,
        ErrorBody,
        ErrorCodeSchema,
        ServiceInfo
    )),
    tags(
        (name = "products", description = "Product catalogue management"),
        (name = "health", description = "Endpoints for health checks"),
        (name = "info", description = "Service metadata")
    )
)]
pub struct ApiDoc;
