//! Cache boundary.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Infrastructure failure talking to the cache backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cache backend failure: {0}")]
pub struct CacheError(String);

impl CacheError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Shared TTL key/value store.
///
/// Values are opaque strings (callers serialize what they need). Concurrent
/// writers for the same key are fine: last write wins, and eventual
/// consistency within the TTL window is accepted.
#[async_trait]
pub trait ContextCache: Send + Sync {
    /// A miss is `Ok(None)`; only a backend failure is an error.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
