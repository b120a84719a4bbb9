//! Builders for HTTP state backed by the configured adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use product_service::domain::ProductService;
use product_service::inbound::http::state::HttpState;
use product_service::outbound::persistence::DieselProductRepository;

use super::ServerConfig;

/// Wire the product service to the Diesel repository and configured cache.
///
/// One service instance backs both the command and query ports.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repository = Arc::new(DieselProductRepository::new(config.db_pool.clone()));
    let service = Arc::new(ProductService::new(
        repository,
        config.cache.clone(),
        Arc::new(DefaultClock),
    ));
    web::Data::new(HttpState::new(service.clone(), service))
}
