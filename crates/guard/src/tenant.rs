//! Lazy tenant-context resolution.
//!
//! Dispatches on the identity's role: plain users carry no tenant context,
//! members resolve through their membership record, owners resolve through
//! the tenant they hold. The resolver performs the lookups; all status policy
//! stays in `agora-auth`.

use std::sync::Arc;

use agora_auth::{Denial, Identity, Role, TenantContext};
use agora_core::SubjectId;
use agora_infra::Directory;

use crate::error::GuardError;

pub struct TenantContextResolver {
    directory: Arc<dyn Directory>,
}

impl TenantContextResolver {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    /// Resolve the tenant context for an identity, or `None` when no tenant
    /// context applies (plain users).
    pub async fn resolve(&self, identity: &Identity) -> Result<Option<TenantContext>, GuardError> {
        match identity.role {
            Role::PlainUser => Ok(None),
            Role::TenantMember => self.load_member(identity.subject_id).await.map(Some),
            Role::TenantOwner => self.load_owner(identity.subject_id).await.map(Some),
        }
    }

    async fn load_member(&self, subject: SubjectId) -> Result<TenantContext, GuardError> {
        let membership = self
            .directory
            .membership_by_subject(subject)
            .await?
            .ok_or(GuardError::Denied(Denial::MembershipMissing))?;

        let tenant = self
            .directory
            .tenant_by_id(membership.tenant_id)
            .await?
            .ok_or_else(|| {
                GuardError::Inconsistent(format!(
                    "membership {} references missing tenant {}",
                    membership.id, membership.tenant_id
                ))
            })?;

        Ok(TenantContext::for_member(
            tenant.id,
            tenant.status,
            membership.id,
            membership.status,
            membership.capabilities.unwrap_or_default(),
        ))
    }

    async fn load_owner(&self, subject: SubjectId) -> Result<TenantContext, GuardError> {
        let tenant = self
            .directory
            .tenant_by_owner(subject)
            .await?
            .ok_or(GuardError::Denied(Denial::MembershipMissing))?;

        Ok(TenantContext::for_owner(tenant.id, tenant.status))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
