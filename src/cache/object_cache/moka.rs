use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, trace};

use crate::cache::{CACHE_TTL_SECS, CacheResult, CachedLinkEntry, LinkCache};

/// In-process cache backed by moka
pub struct MokaLinkCache {
    inner: Cache<String, CachedLinkEntry>,
}

impl MokaLinkCache {
    pub fn new(max_capacity: u64) -> Self {
        Self::with_ttl(max_capacity, Duration::from_secs(CACHE_TTL_SECS))
    }

    fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(
            "MokaLinkCache initialized with max capacity: {}, TTL: {}s",
            max_capacity,
            ttl.as_secs()
        );
        Self { inner }
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn get(&self, code: &str) -> CacheResult {
        match self.inner.get(code).await {
            Some(entry) => {
                trace!("Cache hit: {}", code);
                CacheResult::Found(entry)
            }
            None => {
                trace!("Cache miss: {}", code);
                CacheResult::Miss
            }
        }
    }

    async fn insert(&self, code: &str, entry: CachedLinkEntry) {
        self.inner.insert(code.to_string(), entry).await;
    }

    async fn remove(&self, code: &str) {
        self.inner.invalidate(code).await;
    }
}
