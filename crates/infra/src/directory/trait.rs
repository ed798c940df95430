//! Directory boundary: records and the lookup trait.

use async_trait::async_trait;
use thiserror::Error;

use agora_auth::{AccountStatus, CapabilitySet, MembershipStatus, OwnershipFacts, Role, TenantStatus};
use agora_core::{MembershipId, ResourceId, SubjectId, TenantId};

/// Profile row for an account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub subject_id: SubjectId,
    pub role: Role,
    pub account_status: AccountStatus,
    pub email_verified: bool,
    pub display_name: String,
}

/// Membership row linking a subject to a tenant.
///
/// `capabilities` is `None` when no explicit capability row exists yet; the
/// policy layer applies the implicit default in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: MembershipId,
    pub subject_id: SubjectId,
    pub tenant_id: TenantId,
    pub status: MembershipStatus,
    pub capabilities: Option<CapabilitySet>,
}

/// Tenant row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub id: TenantId,
    pub owner_id: SubjectId,
    pub status: TenantStatus,
}

/// Infrastructure failure talking to the backing store.
///
/// "Not found" is never an error here — lookups return `Ok(None)` for absent
/// rows and the caller decides what that means.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("row decode failed: {0}")]
    Decode(String),
}

/// The backing lookups the pipeline depends on.
///
/// All operations are reads except [`touch_last_active`], which is an
/// idempotent overwrite dispatched fire-and-forget by the caller.
///
/// [`touch_last_active`]: Directory::touch_last_active
#[async_trait]
pub trait Directory: Send + Sync {
    async fn profile_by_subject(&self, subject: SubjectId) -> Result<Option<Profile>, StoreError>;

    async fn membership_by_subject(
        &self,
        subject: SubjectId,
    ) -> Result<Option<Membership>, StoreError>;

    async fn tenant_by_id(&self, tenant: TenantId) -> Result<Option<Tenant>, StoreError>;

    async fn tenant_by_owner(&self, owner: SubjectId) -> Result<Option<Tenant>, StoreError>;

    async fn resource_ownership(
        &self,
        resource: ResourceId,
    ) -> Result<Option<OwnershipFacts>, StoreError>;

    /// Record that a subject was recently active.
    async fn touch_last_active(&self, subject: SubjectId) -> Result<(), StoreError>;
}
