//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ProductCommand, ProductQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub products: Arc<dyn ProductCommand>,
    pub products_query: Arc<dyn ProductQuery>,
}

impl HttpState {
    /// Construct state from the product driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use product_service::domain::ProductService;
    /// use product_service::domain::ports::NoOpProductCache;
    /// use product_service::inbound::http::state::HttpState;
    /// use product_service::outbound::persistence::{DbPool, DieselProductRepository};
    ///
    /// fn state(pool: DbPool) -> HttpState {
    ///     let service = Arc::new(ProductService::new(
    ///         Arc::new(DieselProductRepository::new(pool)),
    ///         Arc::new(NoOpProductCache),
    ///         Arc::new(DefaultClock),
    ///     ));
    ///     HttpState::new(service.clone(), service)
    /// }
    /// ```
    pub fn new(products: Arc<dyn ProductCommand>, products_query: Arc<dyn ProductQuery>) -> Self {
        Self {
            products,
            products_query,
        }
    }
}
