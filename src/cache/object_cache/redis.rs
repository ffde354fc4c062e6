use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, trace, warn};

use crate::cache::{CACHE_TTL_SECS, CacheResult, CachedLinkEntry, LinkCache};
use crate::config::RedisConfig;
use crate::errors::{Result, ShortgateError};

/// Shared cache in Redis. Values are `CachedLinkEntry` JSON under
/// `{key_prefix}{code}`, written with `SETEX`.
pub struct RedisLinkCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护，出错时重置并在下次调用时重建
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisLinkCache {
    /// Only validates the URL; the connection is opened lazily so an
    /// unreachable server degrades to cache misses instead of failing startup.
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.clone()).map_err(|e| {
            ShortgateError::cache_connection(format!(
                "Invalid Redis URL '{}': {}",
                config.url, e
            ))
        })?;

        debug!(
            "RedisLinkCache created with prefix: '{}', TTL: {}s",
            config.key_prefix, CACHE_TTL_SECS
        );

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> redis::RedisResult<MultiplexedConnection> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }

    async fn connection_or_reset(&self) -> Option<MultiplexedConnection> {
        match self.get_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!("Redis unavailable, bypassing cache: {}", e);
                self.reset_connection().await;
                None
            }
        }
    }
}

#[async_trait]
impl LinkCache for RedisLinkCache {
    fn backend_name(&self) -> &str {
        "redis"
    }

    async fn get(&self, code: &str) -> CacheResult {
        let Some(mut conn) = self.connection_or_reset().await else {
            return CacheResult::Miss;
        };

        let result: redis::RedisResult<Option<String>> = conn.get(self.make_key(code)).await;

        match result {
            Ok(Some(data)) => match serde_json::from_str::<CachedLinkEntry>(&data) {
                Ok(entry) => {
                    trace!("Cache hit: {}", code);
                    CacheResult::Found(entry)
                }
                Err(e) => {
                    error!("Failed to decode cached entry for '{}': {}", code, e);
                    CacheResult::Miss
                }
            },
            Ok(None) => {
                trace!("Cache miss: {}", code);
                CacheResult::Miss
            }
            Err(e) => {
                error!("Failed to get cache key '{}': {}", code, e);
                self.reset_connection().await;
                CacheResult::Miss
            }
        }
    }

    async fn insert(&self, code: &str, entry: CachedLinkEntry) {
        let serialized = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to encode cache entry for '{}': {}", code, e);
                return;
            }
        };

        let Some(mut conn) = self.connection_or_reset().await else {
            return;
        };

        match conn
            .set_ex::<String, String, ()>(self.make_key(code), serialized, CACHE_TTL_SECS)
            .await
        {
            Ok(_) => trace!("Cached entry for: {}", code),
            Err(e) => {
                error!("Failed to cache entry for '{}': {}", code, e);
                self.reset_connection().await;
            }
        }
    }

    async fn remove(&self, code: &str) {
        let Some(mut conn) = self.connection_or_reset().await else {
            return;
        };

        match conn.del::<String, i32>(self.make_key(code)).await {
            Ok(deleted) => trace!("Removed {} cache key(s) for: {}", deleted, code),
            Err(e) => {
                error!("Failed to remove cache key '{}': {}", code, e);
                self.reset_connection().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = RedisConfig {
            url: "not a url".to_string(),
            key_prefix: "sg:".to_string(),
        };
        assert!(matches!(
            RedisLinkCache::new(&config),
            Err(ShortgateError::CacheConnection(_))
        ));
    }

    #[test]
    fn test_keys_are_prefixed() {
        let cache = RedisLinkCache::new(&RedisConfig::default()).unwrap();
        assert_eq!(cache.make_key("abc123"), "shortgate:abc123");
    }

    #[tokio::test]
    async fn test_unreachable_server_degrades_to_miss() {
        let config = RedisConfig {
            url: "redis://127.0.0.1:1/".to_string(),
            key_prefix: "sg:".to_string(),
        };
        let cache = RedisLinkCache::new(&config).unwrap();
        assert_eq!(cache.get("abc123").await, CacheResult::Miss);
    }
}
