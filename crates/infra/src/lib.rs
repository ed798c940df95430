//! `agora-infra` — collaborator boundary for the guard pipeline.
//!
//! Two abstractions live here, each with an in-memory backend for tests/dev
//! and a production backend:
//!
//! - [`Directory`]: the backing lookups (profiles, memberships, tenants,
//!   resource ownership) plus the best-effort activity touch. Production
//!   backend is Postgres.
//! - [`ContextCache`]: the shared TTL key/value store used for short-lived
//!   identity caching across requests. Production backend is Redis (behind
//!   the `redis` feature).
//!
//! Infrastructure failures (`StoreError`, `CacheError`) are deliberately
//! distinct from the authorization denial taxonomy: an unreachable store is
//! an internal failure, never a denial.

pub mod cache;
pub mod directory;

pub use cache::{CacheError, ContextCache, MemoryContextCache};
pub use directory::{Directory, InMemoryDirectory, Membership, PgDirectory, Profile, StoreError, Tenant};

#[cfg(feature = "redis")]
pub use cache::RedisContextCache;
