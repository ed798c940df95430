//! Process configuration from the environment.

use std::time::Duration;

use agora_guard::DEFAULT_IDENTITY_TTL;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Postgres directory backend; in-memory when unset (dev only).
    pub database_url: Option<String>,
    /// Redis cache backend; in-memory when unset (dev only).
    pub redis_url: Option<String>,
    pub identity_ttl: Duration,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let bind_addr =
            std::env::var("AGORA_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let identity_ttl = std::env::var("IDENTITY_CACHE_TTL_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_IDENTITY_TTL);

        Self {
            bind_addr,
            jwt_secret,
            database_url: std::env::var("DATABASE_URL").ok(),
            redis_url: std::env::var("REDIS_URL").ok(),
            identity_ttl,
        }
    }
}
