//! Redis cache backend (optional).
//!
//! Uses a connection manager so a dropped connection is re-established
//! transparently; TTL is enforced server-side via `SET ... EX`.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::r#trait::{CacheError, ContextCache};

#[derive(Clone)]
pub struct RedisContextCache {
    conn: ConnectionManager,
}

impl RedisContextCache {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::backend(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ContextCache for RedisContextCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // Redis expiry has whole-second resolution; round up so short TTLs
        // still expire rather than persisting forever.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(key, value, seconds)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(key)
            .await
            .map_err(|e| CacheError::backend(e.to_string()))?;
        Ok(())
    }
}
