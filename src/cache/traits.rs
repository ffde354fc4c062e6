use async_trait::async_trait;

use crate::cache::CachedLinkEntry;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult {
    Found(CachedLinkEntry),
    /// Absent, expired, undecodable, or the backend is unreachable
    Miss,
}

/// Best-effort store of [`CachedLinkEntry`] values keyed by short code.
///
/// Backend failures are logged and swallowed: `get` degrades to
/// [`CacheResult::Miss`], writes become no-ops.
#[async_trait]
pub trait LinkCache: Send + Sync {
    fn backend_name(&self) -> &str;

    async fn get(&self, code: &str) -> CacheResult;

    /// Unconditional overwrite with the fixed TTL
    async fn insert(&self, code: &str, entry: CachedLinkEntry);

    async fn remove(&self, code: &str);
}
