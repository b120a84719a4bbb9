//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{MockProductCommand, MockProductQuery};
use crate::inbound::http::error::{json_config, query_config};
use crate::inbound::http::products;
use crate::inbound::http::state::HttpState;

/// Wrap mocked driving ports in shared handler state.
pub fn product_state(
    command: MockProductCommand,
    query: MockProductQuery,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(Arc::new(command), Arc::new(query)))
}

/// Mount the product routes under `/api/v1` with the production extractor
/// configuration.
pub fn product_routes(state: web::Data<HttpState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(json_config())
            .app_data(query_config())
            .service(web::scope("/api/v1").configure(products::configure));
    }
}
