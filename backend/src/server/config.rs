//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use product_service::domain::ports::{NoOpProductCache, ProductCache};
use product_service::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) cache: Arc<dyn ProductCache>,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr` and backed by
    /// `db_pool`. Caching is disabled until [`ServerConfig::with_cache`] is
    /// called.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            cache: Arc::new(NoOpProductCache),
        }
    }

    /// Attach the product cache adapter.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ProductCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
