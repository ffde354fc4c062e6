//! Resolution cache
//!
//! A time-bounded mirror of link records keyed by short code. The link
//! store stays authoritative; a cached entry may be stale for up to
//! [`CACHE_TTL_SECS`].

use std::sync::Arc;

use tracing::info;

use crate::config::CacheConfig;
use crate::errors::{Result, ShortgateError};

pub mod entry;
pub mod object_cache;
pub mod traits;

pub use entry::CachedLinkEntry;
pub use object_cache::{MokaLinkCache, NullLinkCache, RedisLinkCache};
pub use traits::{CacheResult, LinkCache};

/// Lifetime of every cached entry, in seconds
pub const CACHE_TTL_SECS: u64 = 3600;

pub struct CacheFactory;

impl CacheFactory {
    /// Build the backend named by `cache.type`
    pub fn create(config: &CacheConfig) -> Result<Arc<dyn LinkCache>> {
        let cache: Arc<dyn LinkCache> = match config.cache_type.as_str() {
            "memory" => Arc::new(MokaLinkCache::new(config.memory.max_capacity)),
            "redis" => Arc::new(RedisLinkCache::new(&config.redis)?),
            "null" | "none" => Arc::new(NullLinkCache),
            other => {
                return Err(ShortgateError::config(format!(
                    "Unknown cache type '{}'. Supported: memory, redis, null",
                    other
                )));
            }
        };

        info!("Resolution cache initialized: {}", cache.backend_name());
        Ok(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_known_backends() {
        let mut config = CacheConfig::default();
        assert_eq!(CacheFactory::create(&config).unwrap().backend_name(), "memory");

        config.cache_type = "null".to_string();
        assert_eq!(CacheFactory::create(&config).unwrap().backend_name(), "null");
    }

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let config = CacheConfig {
            cache_type: "memcached".to_string(),
            ..Default::default()
        };
        let err = CacheFactory::create(&config).err().unwrap();
        assert!(matches!(err, ShortgateError::Config(_)));
    }
}
