//! Shared TTL key/value cache used for short-lived identity caching.

pub mod memory;
pub mod r#trait;

#[cfg(feature = "redis")]
pub mod redis;

pub use memory::MemoryContextCache;
pub use r#trait::{CacheError, ContextCache};

#[cfg(feature = "redis")]
pub use self::redis::RedisContextCache;
