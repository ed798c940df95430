//! Capability flags attached to a tenant membership.

use serde::{Deserialize, Serialize};

/// The six independent permission flags a membership can carry.
///
/// Owners never carry a capability set; their authority inside their tenant is
/// capability-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub edit_own_post: bool,
    pub edit_others_post: bool,
    pub approve_requests: bool,
    pub view_all_posts: bool,
    pub delete_posts: bool,
    pub manage_agents: bool,
}

impl Default for CapabilitySet {
    /// The implicit grant for a membership with no explicit capability row.
    fn default() -> Self {
        Self {
            edit_own_post: true,
            edit_others_post: false,
            approve_requests: false,
            view_all_posts: false,
            delete_posts: false,
            manage_agents: false,
        }
    }
}

impl CapabilitySet {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::EditOwnPost => self.edit_own_post,
            Capability::EditOthersPost => self.edit_others_post,
            Capability::ApproveRequests => self.approve_requests,
            Capability::ViewAllPosts => self.view_all_posts,
            Capability::DeletePosts => self.delete_posts,
            Capability::ManageAgents => self.manage_agents,
        }
    }
}

/// Name of a single capability, used by per-operation metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    EditOwnPost,
    EditOthersPost,
    ApproveRequests,
    ViewAllPosts,
    DeletePosts,
    ManageAgents,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::EditOwnPost => "edit_own_post",
            Capability::EditOthersPost => "edit_others_post",
            Capability::ApproveRequests => "approve_requests",
            Capability::ViewAllPosts => "view_all_posts",
            Capability::DeletePosts => "delete_posts",
            Capability::ManageAgents => "manage_agents",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grants_only_edit_own_post() {
        let caps = CapabilitySet::default();
        assert!(caps.allows(Capability::EditOwnPost));
        for cap in [
            Capability::EditOthersPost,
            Capability::ApproveRequests,
            Capability::ViewAllPosts,
            Capability::DeletePosts,
            Capability::ManageAgents,
        ] {
            assert!(!caps.allows(cap), "default unexpectedly grants {cap}");
        }
    }
}
