//! HTTP application wiring (axum router + pipeline wiring).
//!
//! Collaborators are wired explicitly at construction: the cache and the
//! directory are built once here and injected into the guard; nothing is
//! resolved lazily or held in process-wide globals.

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};

use agora_auth::Hs256TokenVerifier;
use agora_guard::GuardPipeline;
use agora_infra::{
    ContextCache, Directory, InMemoryDirectory, MemoryContextCache, PgDirectory,
    RedisContextCache,
};

use crate::config::ApiConfig;
use crate::routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let directory: Arc<dyn Directory> = match &config.database_url {
        Some(url) => Arc::new(
            PgDirectory::connect_lazy(url).context("invalid DATABASE_URL")?,
        ),
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory directory (dev only)");
            Arc::new(InMemoryDirectory::new())
        }
    };

    let cache: Arc<dyn ContextCache> = match &config.redis_url {
        Some(url) => Arc::new(
            RedisContextCache::connect(url)
                .await
                .context("failed to connect to redis")?,
        ),
        None => {
            tracing::warn!("REDIS_URL not set; using in-memory cache (dev only)");
            Arc::new(MemoryContextCache::new())
        }
    };

    let verifier = Arc::new(Hs256TokenVerifier::new(config.jwt_secret.as_bytes()));
    let guard = GuardPipeline::new(verifier, directory, cache)
        .with_identity_ttl(config.identity_ttl);

    Ok(router(Arc::new(guard)))
}

/// Assemble the route tree around a ready-made guard (also used by tests).
pub fn router(guard: Arc<GuardPipeline>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::listings::router())
        .layer(Extension(guard))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
