//! Resource-level allow/deny decisions.
//!
//! Like `status`, this module is pure policy: ownership facts and context go
//! in, a decision comes out. The first matching rule wins.

use serde::{Deserialize, Serialize};

use agora_core::{SubjectId, TenantId};

use crate::capabilities::Capability;
use crate::denial::Denial;
use crate::identity::{Identity, Role};
use crate::tenant::TenantContext;

/// Who created a resource, and under which tenant (if any).
///
/// Resources created outside any tenant (plain-user posts) carry no tenant id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipFacts {
    pub owner_id: SubjectId,
    pub tenant_id: Option<TenantId>,
}

/// Render an allow/deny decision for a target resource.
///
/// Decision table, first matching rule wins:
/// - owner: allow iff the resource belongs to the owner's tenant, otherwise
///   `CrossTenantAccess`;
/// - member: the membership record must be present; self-authored resources
///   are always allowed; others' resources require same tenant *and* the
///   `edit_others_post` flag, otherwise `InsufficientCapability`;
/// - plain user: allow iff self-authored, otherwise `InsufficientCapability`.
pub fn authorize_resource(
    identity: &Identity,
    tenant: Option<&TenantContext>,
    facts: &OwnershipFacts,
) -> Result<(), Denial> {
    match identity.role {
        Role::TenantOwner => {
            let context = tenant.ok_or(Denial::MembershipMissing)?;
            if facts.tenant_id == Some(context.tenant_id) {
                Ok(())
            } else {
                Err(Denial::CrossTenantAccess)
            }
        }
        Role::TenantMember => {
            let context = tenant.ok_or(Denial::MembershipMissing)?;
            if context.membership_id.is_none() {
                return Err(Denial::MembershipMissing);
            }
            if facts.owner_id == identity.subject_id {
                return Ok(());
            }
            let same_tenant = facts.tenant_id == Some(context.tenant_id);
            if same_tenant && context.effective_capabilities().edit_others_post {
                Ok(())
            } else {
                Err(Denial::InsufficientCapability)
            }
        }
        Role::PlainUser => {
            if facts.owner_id == identity.subject_id {
                Ok(())
            } else {
                Err(Denial::InsufficientCapability)
            }
        }
    }
}

/// Enforce an operation's declared capability requirement.
///
/// Owners pass unconditionally (capability-free full authority inside their
/// tenant). Members need the flag set, with defaults applied when the
/// membership has no explicit capability row. Plain users carry no capability
/// set at all and are denied.
pub fn ensure_capability(
    identity: &Identity,
    tenant: Option<&TenantContext>,
    capability: Capability,
) -> Result<(), Denial> {
    match identity.role {
        Role::TenantOwner => Ok(()),
        Role::TenantMember => {
            let context = tenant.ok_or(Denial::MembershipMissing)?;
            if context.effective_capabilities().allows(capability) {
                Ok(())
            } else {
                Err(Denial::InsufficientCapability)
            }
        }
        Role::PlainUser => Err(Denial::InsufficientCapability),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilitySet;
    use crate::identity::AccountStatus;
    use crate::tenant::{MembershipStatus, TenantStatus};
    use agora_core::MembershipId;

    fn identity(subject: i64, role: Role) -> Identity {
        Identity {
            subject_id: SubjectId::new(subject),
            role,
            account_status: AccountStatus::Active,
            email_verified: true,
            display_name: "Kim".to_string(),
        }
    }

    fn member_context(tenant: i64, caps: CapabilitySet) -> TenantContext {
        TenantContext::for_member(
            TenantId::new(tenant),
            TenantStatus::Active,
            MembershipId::new(7),
            MembershipStatus::Active,
            caps,
        )
    }

    fn facts(owner: i64, tenant: Option<i64>) -> OwnershipFacts {
        OwnershipFacts {
            owner_id: SubjectId::new(owner),
            tenant_id: tenant.map(TenantId::new),
        }
    }

    #[test]
    fn owner_allowed_within_own_tenant() {
        let id = identity(1, Role::TenantOwner);
        let ctx = TenantContext::for_owner(TenantId::new(1), TenantStatus::Active);
        assert_eq!(
            authorize_resource(&id, Some(&ctx), &facts(999, Some(1))),
            Ok(())
        );
    }

    #[test]
    fn owner_denied_across_tenants() {
        let id = identity(1, Role::TenantOwner);
        let ctx = TenantContext::for_owner(TenantId::new(1), TenantStatus::Active);
        assert_eq!(
            authorize_resource(&id, Some(&ctx), &facts(999, Some(2))),
            Err(Denial::CrossTenantAccess)
        );
    }

    #[test]
    fn owner_denied_for_untenanted_resource() {
        let id = identity(1, Role::TenantOwner);
        let ctx = TenantContext::for_owner(TenantId::new(1), TenantStatus::Active);
        assert_eq!(
            authorize_resource(&id, Some(&ctx), &facts(999, None)),
            Err(Denial::CrossTenantAccess)
        );
    }

    #[test]
    fn member_allowed_for_own_resource() {
        let id = identity(5, Role::TenantMember);
        let ctx = member_context(1, CapabilitySet::default());
        assert_eq!(
            authorize_resource(&id, Some(&ctx), &facts(5, Some(1))),
            Ok(())
        );
    }

    #[test]
    fn member_without_edit_others_denied_for_foreign_resource() {
        let id = identity(5, Role::TenantMember);
        let ctx = member_context(1, CapabilitySet::default());
        // Same tenant, different author: the flag decides.
        assert_eq!(
            authorize_resource(&id, Some(&ctx), &facts(999, Some(1))),
            Err(Denial::InsufficientCapability)
        );
    }

    #[test]
    fn edit_others_flag_flips_foreign_resource_to_allow() {
        let id = identity(5, Role::TenantMember);
        let caps = CapabilitySet {
            edit_others_post: true,
            ..CapabilitySet::default()
        };
        let ctx = member_context(1, caps);
        assert_eq!(
            authorize_resource(&id, Some(&ctx), &facts(999, Some(1))),
            Ok(())
        );
    }

    #[test]
    fn edit_others_flag_does_not_cross_tenants() {
        let id = identity(5, Role::TenantMember);
        let caps = CapabilitySet {
            edit_others_post: true,
            ..CapabilitySet::default()
        };
        let ctx = member_context(1, caps);
        assert_eq!(
            authorize_resource(&id, Some(&ctx), &facts(999, Some(2))),
            Err(Denial::InsufficientCapability)
        );
    }

    #[test]
    fn member_without_context_is_membership_missing() {
        let id = identity(5, Role::TenantMember);
        assert_eq!(
            authorize_resource(&id, None, &facts(5, Some(1))),
            Err(Denial::MembershipMissing)
        );
    }

    #[test]
    fn plain_user_allowed_only_for_own_resource() {
        let id = identity(3, Role::PlainUser);
        assert_eq!(authorize_resource(&id, None, &facts(3, None)), Ok(()));
        assert_eq!(
            authorize_resource(&id, None, &facts(4, None)),
            Err(Denial::InsufficientCapability)
        );
    }

    #[test]
    fn capability_gate_owner_passes_without_flags() {
        let id = identity(1, Role::TenantOwner);
        let ctx = TenantContext::for_owner(TenantId::new(1), TenantStatus::Active);
        assert_eq!(
            ensure_capability(&id, Some(&ctx), Capability::ManageAgents),
            Ok(())
        );
    }

    #[test]
    fn capability_gate_member_needs_flag() {
        let id = identity(5, Role::TenantMember);
        let ctx = member_context(1, CapabilitySet::default());
        assert_eq!(
            ensure_capability(&id, Some(&ctx), Capability::DeletePosts),
            Err(Denial::InsufficientCapability)
        );

        let granted = member_context(
            1,
            CapabilitySet {
                delete_posts: true,
                ..CapabilitySet::default()
            },
        );
        assert_eq!(
            ensure_capability(&id, Some(&granted), Capability::DeletePosts),
            Ok(())
        );
    }

    #[test]
    fn capability_gate_denies_plain_user() {
        let id = identity(3, Role::PlainUser);
        assert_eq!(
            ensure_capability(&id, None, Capability::ViewAllPosts),
            Err(Denial::InsufficientCapability)
        );
    }
}
