use async_trait::async_trait;
use tracing::trace;

use crate::cache::{CacheResult, CachedLinkEntry, LinkCache};

/// Caching disabled: every lookup misses, every write is dropped
pub struct NullLinkCache;

#[async_trait]
impl LinkCache for NullLinkCache {
    fn backend_name(&self) -> &str {
        "null"
    }

    async fn get(&self, code: &str) -> CacheResult {
        trace!("NullLinkCache.get called for code: {}", code);
        CacheResult::Miss
    }

    async fn insert(&self, code: &str, _entry: CachedLinkEntry) {
        trace!("NullLinkCache.insert called for code: {}", code);
    }

    async fn remove(&self, code: &str) {
        trace!("NullLinkCache.remove called for code: {}", code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_get_still_misses() {
        let cache = NullLinkCache;
        cache
            .insert(
                "abc123",
                CachedLinkEntry {
                    id: "id-1".to_string(),
                    code: "abc123".to_string(),
                    target_url: "https://example.com".to_string(),
                    is_active: true,
                    expires_at: None,
                },
            )
            .await;

        assert_eq!(cache.get("abc123").await, CacheResult::Miss);
        cache.remove("abc123").await;
    }
}
