//! Product service entry-point: loads settings, prepares the database and
//! cache adapters, and serves the REST API with OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use product_service::domain::ports::{ProductCache, ProductCacheError};
use product_service::inbound::http::health::HealthState;
use product_service::outbound::cache::{InMemoryProductCache, RedisProductCache};
use product_service::outbound::persistence::{DbPool, run_migrations};
use product_service::settings::ProductServiceSettings;
use server::ServerConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ProductServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;

    if settings.run_migrations() {
        run_migrations(settings.database_url()?).await?;
    }

    let pool = DbPool::new(settings.pool_config()?).await?;
    let cache = build_cache(&settings).await?;
    let config = ServerConfig::new(settings.bind_addr()?, pool).with_cache(cache);

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state.clone(), config)?;
    server.await?;
    health_state.mark_unhealthy();
    info!("product service stopped");
    Ok(())
}

/// Choose Redis when a URL is configured, otherwise the in-process cache.
async fn build_cache(
    settings: &ProductServiceSettings,
) -> Result<Arc<dyn ProductCache>, ProductCacheError> {
    let ttl = settings.cache_ttl();
    match settings.redis_url() {
        Some(url) => {
            info!(ttl_secs = ttl.as_secs(), "using Redis product cache");
            Ok(Arc::new(RedisProductCache::connect(url, ttl).await?))
        }
        None => {
            info!(ttl_secs = ttl.as_secs(), "using in-process product cache");
            Ok(Arc::new(InMemoryProductCache::new(ttl)))
        }
    }
}
