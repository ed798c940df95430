//! Identity resolution with short-lived caching.
//!
//! The builder owns the cache-or-load decision: consult the shared TTL cache
//! first, fall back to the profile store, refresh the cache on the way out.
//! Two concurrent requests for the same subject may both miss and both write;
//! last write wins, which is correct because both values derive from the same
//! source at that instant.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_auth::{Denial, Identity};
use agora_core::SubjectId;
use agora_infra::{ContextCache, Directory};

use crate::error::GuardError;

/// How long a resolved identity may be served from cache. Staleness within
/// this window is an accepted invariant relaxation, not a bug.
pub const DEFAULT_IDENTITY_TTL: Duration = Duration::from_secs(300);

const CACHE_KEY_PREFIX: &str = "ctx:";

/// Cache entry wrapping an identity with its own expiry stamp.
///
/// The backend enforces the TTL too; the stamp makes expiry decisions
/// independent of backend clock behavior and survives backends that persist
/// past their nominal TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedIdentity {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

pub struct IdentityBuilder {
    directory: Arc<dyn Directory>,
    cache: Arc<dyn ContextCache>,
    ttl: Duration,
}

impl IdentityBuilder {
    pub fn new(directory: Arc<dyn Directory>, cache: Arc<dyn ContextCache>) -> Self {
        Self {
            directory,
            cache,
            ttl: DEFAULT_IDENTITY_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn cache_key(subject: SubjectId) -> String {
        format!("{CACHE_KEY_PREFIX}{subject}")
    }

    /// Resolve the identity for a subject, cache-first.
    ///
    /// Fails with `Denial::AccountNotFound` when no profile exists. A cache
    /// read failure is an infrastructure failure and propagates; a cache
    /// write failure is logged and swallowed (the identity is already in
    /// hand). Either path issues the best-effort activity touch.
    pub async fn build(&self, subject: SubjectId) -> Result<Identity, GuardError> {
        let key = Self::cache_key(subject);

        if let Some(raw) = self.cache.get(&key).await? {
            match serde_json::from_str::<CachedIdentity>(&raw) {
                Ok(cached) if cached.expires_at > Utc::now() => {
                    self.touch(subject);
                    return Ok(cached.identity);
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%subject, error = %err, "undecodable cached identity, reloading");
                }
            }
        }

        let profile = self
            .directory
            .profile_by_subject(subject)
            .await?
            .ok_or(GuardError::Denied(Denial::AccountNotFound))?;

        let identity = Identity {
            subject_id: profile.subject_id,
            role: profile.role,
            account_status: profile.account_status,
            email_verified: profile.email_verified,
            display_name: profile.display_name,
        };

        let entry = CachedIdentity {
            identity: identity.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(self.ttl.as_secs() as i64),
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(err) = self.cache.set(&key, raw, self.ttl).await {
                    tracing::warn!(%subject, error = %err, "identity cache write failed");
                }
            }
            Err(err) => {
                tracing::warn!(%subject, error = %err, "identity cache encode failed");
            }
        }

        self.touch(subject);
        Ok(identity)
    }

    /// Drop the cached identity for a subject.
    ///
    /// Called by credential-affecting mutations (role change, suspension,
    /// logout-everywhere) so the next request reloads from the store.
    pub async fn invalidate(&self, subject: SubjectId) -> Result<(), GuardError> {
        self.cache.delete(&Self::cache_key(subject)).await?;
        Ok(())
    }

    /// Fire-and-forget "recently active" mark. Never blocks the pipeline,
    /// never fails it.
    fn touch(&self, subject: SubjectId) {
        let directory = Arc::clone(&self.directory);
        tokio::spawn(async move {
            if let Err(err) = directory.touch_last_active(subject).await {
                tracing::warn!(%subject, error = %err, "last-active touch failed");
            }
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use agora_auth::{AccountStatus, OwnershipFacts, Role};
    use agora_core::{ResourceId, TenantId};
    use agora_infra::{InMemoryDirectory, Membership, MemoryContextCache, Profile, StoreError, Tenant};

    /// Delegating directory that counts profile lookups.
    struct CountingDirectory {
        inner: InMemoryDirectory,
        profile_lookups: AtomicUsize,
    }

    impl CountingDirectory {
        fn new(inner: InMemoryDirectory) -> Self {
            Self {
                inner,
                profile_lookups: AtomicUsize::new(0),
            }
        }

        fn lookups(&self) -> usize {
            self.profile_lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Directory for CountingDirectory {
        async fn profile_by_subject(
            &self,
            subject: SubjectId,
        ) -> Result<Option<Profile>, StoreError> {
            self.profile_lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.profile_by_subject(subject).await
        }

        async fn membership_by_subject(
            &self,
            subject: SubjectId,
        ) -> Result<Option<Membership>, StoreError> {
            self.inner.membership_by_subject(subject).await
        }

        async fn tenant_by_id(&self, tenant: TenantId) -> Result<Option<Tenant>, StoreError> {
            self.inner.tenant_by_id(tenant).await
        }

        async fn tenant_by_owner(&self, owner: SubjectId) -> Result<Option<Tenant>, StoreError> {
            self.inner.tenant_by_owner(owner).await
        }

        async fn resource_ownership(
            &self,
            resource: ResourceId,
        ) -> Result<Option<OwnershipFacts>, StoreError> {
            self.inner.resource_ownership(resource).await
        }

        async fn touch_last_active(&self, subject: SubjectId) -> Result<(), StoreError> {
            self.inner.touch_last_active(subject).await
        }
    }

    /// Directory whose activity touch always fails.
    struct FailingTouchDirectory {
        inner: InMemoryDirectory,
    }

    #[async_trait]
    impl Directory for FailingTouchDirectory {
        async fn profile_by_subject(
            &self,
            subject: SubjectId,
        ) -> Result<Option<Profile>, StoreError> {
            self.inner.profile_by_subject(subject).await
        }

        async fn membership_by_subject(
            &self,
            subject: SubjectId,
        ) -> Result<Option<Membership>, StoreError> {
            self.inner.membership_by_subject(subject).await
        }

        async fn tenant_by_id(&self, tenant: TenantId) -> Result<Option<Tenant>, StoreError> {
            self.inner.tenant_by_id(tenant).await
        }

        async fn tenant_by_owner(&self, owner: SubjectId) -> Result<Option<Tenant>, StoreError> {
            self.inner.tenant_by_owner(owner).await
        }

        async fn resource_ownership(
            &self,
            resource: ResourceId,
        ) -> Result<Option<OwnershipFacts>, StoreError> {
            self.inner.resource_ownership(resource).await
        }

        async fn touch_last_active(&self, _subject: SubjectId) -> Result<(), StoreError> {
            Err(StoreError::Query("activity store offline".to_string()))
        }
    }

    fn profile(subject: i64) -> Profile {
        Profile {
            subject_id: SubjectId::new(subject),
            role: Role::PlainUser,
            account_status: AccountStatus::Active,
            email_verified: true,
            display_name: "Jo".to_string(),
        }
    }

    fn builder_over(directory: Arc<dyn Directory>) -> IdentityBuilder {
        IdentityBuilder::new(directory, Arc::new(MemoryContextCache::new()))
    }

    #[tokio::test]
    async fn second_build_within_ttl_hits_cache() {
        let inner = InMemoryDirectory::new();
        inner.insert_profile(profile(7));
        let directory = Arc::new(CountingDirectory::new(inner));
        let builder = builder_over(directory.clone());

        let first = builder.build(SubjectId::new(7)).await.unwrap();
        let second = builder.build(SubjectId::new(7)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(directory.lookups(), 1);
    }

    #[tokio::test]
    async fn build_after_ttl_expiry_reloads() {
        let inner = InMemoryDirectory::new();
        inner.insert_profile(profile(7));
        let directory = Arc::new(CountingDirectory::new(inner));
        let builder = builder_over(directory.clone()).with_ttl(Duration::from_millis(1));

        builder.build(SubjectId::new(7)).await.unwrap();
        std::thread::sleep(Duration::from_millis(10));
        builder.build(SubjectId::new(7)).await.unwrap();

        assert_eq!(directory.lookups(), 2);
    }

    #[tokio::test]
    async fn unknown_subject_is_account_not_found() {
        let directory = Arc::new(InMemoryDirectory::new());
        let builder = builder_over(directory);

        let err = builder.build(SubjectId::new(404)).await.unwrap_err();
        assert_eq!(err, GuardError::Denied(Denial::AccountNotFound));
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let inner = InMemoryDirectory::new();
        inner.insert_profile(profile(7));
        let directory = Arc::new(CountingDirectory::new(inner));
        let builder = builder_over(directory.clone());

        builder.build(SubjectId::new(7)).await.unwrap();
        builder.invalidate(SubjectId::new(7)).await.unwrap();
        builder.build(SubjectId::new(7)).await.unwrap();

        assert_eq!(directory.lookups(), 2);
    }

    #[tokio::test]
    async fn undecodable_cache_entry_falls_back_to_store() {
        let inner = InMemoryDirectory::new();
        inner.insert_profile(profile(7));
        let directory = Arc::new(CountingDirectory::new(inner));
        let cache = Arc::new(MemoryContextCache::new());
        cache
            .set("ctx:7", "{not json".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        let builder = IdentityBuilder::new(directory.clone(), cache);
        let identity = builder.build(SubjectId::new(7)).await.unwrap();

        assert_eq!(identity.subject_id, SubjectId::new(7));
        assert_eq!(directory.lookups(), 1);
    }

    #[tokio::test]
    async fn failing_touch_never_fails_the_build() {
        let inner = InMemoryDirectory::new();
        inner.insert_profile(profile(7));
        let directory = Arc::new(FailingTouchDirectory { inner });

        let builder = builder_over(directory);
        assert!(builder.build(SubjectId::new(7)).await.is_ok());
    }

    #[tokio::test]
    async fn build_marks_subject_recently_active() {
        let inner = Arc::new(InMemoryDirectory::new());
        inner.insert_profile(profile(7));
        let builder = builder_over(inner.clone());

        builder.build(SubjectId::new(7)).await.unwrap();

        // The touch runs on its own task; give the runtime a chance to poll it.
        for _ in 0..20 {
            tokio::task::yield_now().await;
            if inner.last_active(SubjectId::new(7)).is_some() {
                break;
            }
        }
        assert!(inner.last_active(SubjectId::new(7)).is_some());
    }
}
