//! Authenticated identity model.

use serde::{Deserialize, Serialize};

use agora_core::SubjectId;

/// Role of an authenticated subject.
///
/// The role decides which tenant-context loader applies: plain users carry no
/// tenant context at all, members act within a tenant under a capability set,
/// owners hold the tenant outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    PlainUser,
    TenantMember,
    TenantOwner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PlainUser => "plain_user",
            Role::TenantMember => "tenant_member",
            Role::TenantOwner => "tenant_owner",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is active and can authenticate/transact.
    #[default]
    Active,
    /// Account is suspended; every operation is blocked regardless of role.
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified identity, built once per request and immutable afterwards.
///
/// # Invariants
/// - Exactly one `Identity` exists per request once authentication succeeds.
/// - Fields reflect the profile store at build time; staleness is bounded by
///   the identity cache TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: SubjectId,
    pub role: Role,
    pub account_status: AccountStatus,
    pub email_verified: bool,
    pub display_name: String,
}

impl Identity {
    pub fn is_suspended(&self) -> bool {
        self.account_status == AccountStatus::Suspended
    }
}
