//! Process-local product cache.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ProductCache, ProductCacheError, ProductCacheKey, ProductPayload};

#[derive(Debug, Clone)]
struct Entry {
    payload: ProductPayload,
    expires_at: Instant,
}

/// Cache holding product payloads in memory until their TTL elapses.
///
/// Expired entries are dropped on lookup of the same key and swept from the
/// whole map on every write, so the map only grows with live entries.
#[derive(Debug)]
pub struct InMemoryProductCache {
    ttl: Duration,
    entries: RwLock<HashMap<ProductCacheKey, Entry>>,
}

impl InMemoryProductCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ProductCache for InMemoryProductCache {
    async fn get(&self, key: &ProductCacheKey) -> Result<Option<ProductPayload>, ProductCacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.payload.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn put(
        &self,
        key: &ProductCacheKey,
        product: &ProductPayload,
    ) -> Result<(), ProductCacheError> {
        let now = Instant::now();
        let entry = Entry {
            payload: product.clone(),
            expires_at: now + self.ttl,
        };
        let mut entries = self.entries.write().await;
        entries.retain(|_, held| held.expires_at > now);
        entries.insert(key.clone(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &ProductCacheKey) -> Result<(), ProductCacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
