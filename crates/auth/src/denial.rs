//! Denial taxonomy.
//!
//! Every category is terminal: the pipeline never retries or recovers a
//! denial, it surfaces the category to the caller as a value. Infrastructure
//! failures are deliberately *not* part of this enum (see `agora-infra`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// Credential absent, malformed, badly signed, or expired. All token
    /// verification failures collapse here so internals never leak outward.
    #[error("invalid credential")]
    InvalidCredential,

    /// Token verified but no profile exists for the subject.
    #[error("account not found")]
    AccountNotFound,

    /// Account is suspended; blocks every operation regardless of role.
    #[error("account suspended")]
    AccountSuspended,

    /// No membership record (members), or no tenant associated (owners).
    #[error("membership missing")]
    MembershipMissing,

    #[error("membership inactive")]
    MembershipInactive,

    #[error("membership terminated")]
    MembershipTerminated,

    #[error("tenant suspended")]
    TenantSuspended,

    /// Blocks delegated members only; owners of an inactive tenant keep access.
    #[error("tenant inactive")]
    TenantInactive,

    #[error("insufficient capability")]
    InsufficientCapability,

    #[error("cross-tenant access")]
    CrossTenantAccess,

    #[error("resource not found")]
    ResourceNotFound,
}

impl Denial {
    /// Stable machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            Denial::InvalidCredential => "invalid_credential",
            Denial::AccountNotFound => "account_not_found",
            Denial::AccountSuspended => "account_suspended",
            Denial::MembershipMissing => "membership_missing",
            Denial::MembershipInactive => "membership_inactive",
            Denial::MembershipTerminated => "membership_terminated",
            Denial::TenantSuspended => "tenant_suspended",
            Denial::TenantInactive => "tenant_inactive",
            Denial::InsufficientCapability => "insufficient_capability",
            Denial::CrossTenantAccess => "cross_tenant_access",
            Denial::ResourceNotFound => "resource_not_found",
        }
    }
}
