//! Status validation over a fully-resolved context.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use crate::denial::Denial;
use crate::identity::{Identity, Role};
use crate::tenant::{MembershipStatus, TenantContext, TenantStatus};

/// Validate cross-cutting status rules for a request context.
///
/// Rules are evaluated in order and the first failure wins:
/// 1. a suspended account is blocked unconditionally, role-independent,
///    tenant context or not;
/// 2. a member's membership must not be inactive or terminated;
/// 3. a member's tenant must not be suspended or inactive;
/// 4. an owner's tenant must not be suspended. Owners of an *inactive* tenant
///    keep access; only suspension blocks them.
///
/// Callers must re-invoke this every time a `TenantContext` is available,
/// including the "already loaded" short-circuit path within a request.
pub fn validate_status(identity: &Identity, tenant: Option<&TenantContext>) -> Result<(), Denial> {
    if identity.is_suspended() {
        return Err(Denial::AccountSuspended);
    }

    let Some(context) = tenant else {
        return Ok(());
    };

    match identity.role {
        Role::PlainUser => Ok(()),
        Role::TenantMember => {
            match context.membership_status {
                Some(MembershipStatus::Inactive) => return Err(Denial::MembershipInactive),
                Some(MembershipStatus::Terminated) => return Err(Denial::MembershipTerminated),
                Some(MembershipStatus::Active) | None => {}
            }
            match context.tenant_status {
                TenantStatus::Suspended => Err(Denial::TenantSuspended),
                TenantStatus::Inactive => Err(Denial::TenantInactive),
                TenantStatus::Active => Ok(()),
            }
        }
        Role::TenantOwner => match context.tenant_status {
            TenantStatus::Suspended => Err(Denial::TenantSuspended),
            TenantStatus::Inactive | TenantStatus::Active => Ok(()),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
