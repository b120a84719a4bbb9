//! Redis-backed product cache using a `bb8-redis` connection pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::Pool;
use bb8_redis::redis;
use rand::Rng;
use tracing::debug;

use crate::domain::ports::{ProductCache, ProductCacheError, ProductCacheKey, ProductPayload};

/// Upper bound of the random extension applied to each TTL, as a divisor of
/// the base TTL (10 means up to +10%).
const JITTER_DIVISOR: u64 = 10;

/// Cache storing JSON encoded product payloads in Redis.
#[derive(Clone)]
pub struct RedisProductCache {
    pool: Pool<RedisConnectionManager>,
    ttl: Duration,
}

impl RedisProductCache {
    /// Connect a pool to `redis_url`. Entries expire after `ttl` plus jitter.
    ///
    /// # Errors
    ///
    /// Returns [`ProductCacheError::Backend`] when the URL is invalid or the
    /// pool cannot be built.
    pub async fn connect(redis_url: &str, ttl: Duration) -> Result<Self, ProductCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| ProductCacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| ProductCacheError::backend(err.to_string()))?;
        Ok(Self::with_pool(pool, ttl))
    }

    /// Wrap an existing pool.
    pub fn with_pool(pool: Pool<RedisConnectionManager>, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    async fn connection(
        &self,
    ) -> Result<bb8_redis::bb8::PooledConnection<'_, RedisConnectionManager>, ProductCacheError>
    {
        self.pool
            .get()
            .await
            .map_err(|err| ProductCacheError::backend(err.to_string()))
    }
}

/// Seconds to keep an entry: the base TTL plus up to a tenth more, never
/// less than one second.
fn ttl_with_jitter(ttl: Duration) -> u64 {
    let base = ttl.as_secs().max(1);
    let spread = base / JITTER_DIVISOR;
    if spread == 0 {
        return base;
    }
    base + rand::thread_rng().gen_range(0..=spread)
}

fn encode(product: &ProductPayload) -> Result<String, ProductCacheError> {
    serde_json::to_string(product).map_err(|err| ProductCacheError::serialization(err.to_string()))
}

fn decode(raw: &str) -> Result<ProductPayload, ProductCacheError> {
    serde_json::from_str(raw).map_err(|err| ProductCacheError::serialization(err.to_string()))
}

#[async_trait]
impl ProductCache for RedisProductCache {
    async fn get(&self, key: &ProductCacheKey) -> Result<Option<ProductPayload>, ProductCacheError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(|err| ProductCacheError::backend(err.to_string()))?;
        debug!(key = key.as_str(), hit = raw.is_some(), "redis cache lookup");
        raw.as_deref().map(decode).transpose()
    }

    async fn put(
        &self,
        key: &ProductCacheKey,
        product: &ProductPayload,
    ) -> Result<(), ProductCacheError> {
        let body = encode(product)?;
        let mut conn = self.connection().await?;
        let (): () = redis::cmd("SET")
            .arg(key.as_str())
            .arg(body)
            .arg("EX")
            .arg(ttl_with_jitter(self.ttl))
            .query_async(&mut *conn)
            .await
            .map_err(|err| ProductCacheError::backend(err.to_string()))?;
        Ok(())
    }

    async fn invalidate(&self, key: &ProductCacheKey) -> Result<(), ProductCacheError> {
        let mut conn = self.connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key.as_str())
            .query_async(&mut *conn)
            .await
            .map_err(|err| ProductCacheError::backend(err.to_string()))?;
        debug!(key = key.as_str(), removed, "redis cache invalidation");
        Ok(())
    }
}
