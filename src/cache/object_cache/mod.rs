mod moka;
mod null;
mod redis;

pub use moka::MokaLinkCache;
pub use null::NullLinkCache;
pub use redis::RedisLinkCache;
