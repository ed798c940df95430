//! Tenant context resolved for a request.

use serde::{Deserialize, Serialize};

use agora_core::{MembershipId, TenantId};

use crate::capabilities::CapabilitySet;

/// Tenant lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Active,
    Inactive,
    Suspended,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Inactive => "inactive",
            TenantStatus::Suspended => "suspended",
        }
    }
}

impl core::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership lifecycle status (delegated members only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Inactive,
    Terminated,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Inactive => "inactive",
            MembershipStatus::Terminated => "terminated",
        }
    }
}

impl core::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant context attached to a request after lazy resolution.
///
/// Resolved at most once per request and memoized on the request context;
/// never cached across requests.
///
/// # Invariants
/// - `is_owner == true` implies `membership_id`, `membership_status` and
///   `capabilities` are all `None`.
/// - `is_owner == false` implies all three are `Some` (a delegated member
///   always acts through a membership record).
///
/// The two constructors are the only way this crate builds the value, so the
/// shape invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub tenant_status: TenantStatus,
    pub is_owner: bool,
    pub membership_id: Option<MembershipId>,
    pub membership_status: Option<MembershipStatus>,
    pub capabilities: Option<CapabilitySet>,
}

impl TenantContext {
    /// Context for the tenant's owner: no membership record, no capabilities.
    pub fn for_owner(tenant_id: TenantId, tenant_status: TenantStatus) -> Self {
        Self {
            tenant_id,
            tenant_status,
            is_owner: true,
            membership_id: None,
            membership_status: None,
            capabilities: None,
        }
    }

    /// Context for a delegated member acting under a capability set.
    pub fn for_member(
        tenant_id: TenantId,
        tenant_status: TenantStatus,
        membership_id: MembershipId,
        membership_status: MembershipStatus,
        capabilities: CapabilitySet,
    ) -> Self {
        Self {
            tenant_id,
            tenant_status,
            is_owner: false,
            membership_id: Some(membership_id),
            membership_status: Some(membership_status),
            capabilities: Some(capabilities),
        }
    }

    /// The effective capability set: explicit flags, or the implicit default
    /// when the membership has no capability row.
    pub fn effective_capabilities(&self) -> CapabilitySet {
        self.capabilities.unwrap_or_default()
    }
}
