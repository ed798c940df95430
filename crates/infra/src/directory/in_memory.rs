//! In-memory directory backend.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use agora_auth::OwnershipFacts;
use agora_core::{ResourceId, SubjectId, TenantId};

use super::r#trait::{Directory, Membership, Profile, StoreError, Tenant};

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    profiles: RwLock<HashMap<SubjectId, Profile>>,
    memberships: RwLock<HashMap<SubjectId, Membership>>,
    tenants: RwLock<HashMap<TenantId, Tenant>>,
    resources: RwLock<HashMap<ResourceId, OwnershipFacts>>,
    last_active: RwLock<HashMap<SubjectId, DateTime<Utc>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_profile(&self, profile: Profile) {
        if let Ok(mut profiles) = self.profiles.write() {
            profiles.insert(profile.subject_id, profile);
        }
    }

    pub fn insert_membership(&self, membership: Membership) {
        if let Ok(mut memberships) = self.memberships.write() {
            memberships.insert(membership.subject_id, membership);
        }
    }

    pub fn insert_tenant(&self, tenant: Tenant) {
        if let Ok(mut tenants) = self.tenants.write() {
            tenants.insert(tenant.id, tenant);
        }
    }

    pub fn insert_resource(&self, resource: ResourceId, facts: OwnershipFacts) {
        if let Ok(mut resources) = self.resources.write() {
            resources.insert(resource, facts);
        }
    }

    /// Last recorded activity for a subject, if any.
    pub fn last_active(&self, subject: SubjectId) -> Option<DateTime<Utc>> {
        self.last_active
            .read()
            .ok()
            .and_then(|map| map.get(&subject).copied())
    }
}

fn poisoned() -> StoreError {
    StoreError::Query("lock poisoned".to_string())
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn profile_by_subject(&self, subject: SubjectId) -> Result<Option<Profile>, StoreError> {
        let profiles = self.profiles.read().map_err(|_| poisoned())?;
        Ok(profiles.get(&subject).cloned())
    }

    async fn membership_by_subject(
        &self,
        subject: SubjectId,
    ) -> Result<Option<Membership>, StoreError> {
        let memberships = self.memberships.read().map_err(|_| poisoned())?;
        Ok(memberships.get(&subject).cloned())
    }

    async fn tenant_by_id(&self, tenant: TenantId) -> Result<Option<Tenant>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| poisoned())?;
        Ok(tenants.get(&tenant).cloned())
    }

    async fn tenant_by_owner(&self, owner: SubjectId) -> Result<Option<Tenant>, StoreError> {
        let tenants = self.tenants.read().map_err(|_| poisoned())?;
        Ok(tenants.values().find(|t| t.owner_id == owner).cloned())
    }

    async fn resource_ownership(
        &self,
        resource: ResourceId,
    ) -> Result<Option<OwnershipFacts>, StoreError> {
        let resources = self.resources.read().map_err(|_| poisoned())?;
        Ok(resources.get(&resource).copied())
    }

    async fn touch_last_active(&self, subject: SubjectId) -> Result<(), StoreError> {
        let mut last_active = self.last_active.write().map_err(|_| poisoned())?;
        last_active.insert(subject, Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_auth::{AccountStatus, Role};

    fn profile(subject: i64) -> Profile {
        Profile {
            subject_id: SubjectId::new(subject),
            role: Role::PlainUser,
            account_status: AccountStatus::Active,
            email_verified: true,
            display_name: "Robin".to_string(),
        }
    }

    #[tokio::test]
    async fn absent_rows_are_none_not_errors() {
        let dir = InMemoryDirectory::new();
        assert_eq!(dir.profile_by_subject(SubjectId::new(1)).await, Ok(None));
        assert_eq!(dir.tenant_by_owner(SubjectId::new(1)).await, Ok(None));
        assert_eq!(
            dir.resource_ownership(ResourceId::new(1)).await,
            Ok(None)
        );
    }

    #[tokio::test]
    async fn touch_records_activity() {
        let dir = InMemoryDirectory::new();
        dir.insert_profile(profile(1));

        assert!(dir.last_active(SubjectId::new(1)).is_none());
        dir.touch_last_active(SubjectId::new(1)).await.unwrap();
        assert!(dir.last_active(SubjectId::new(1)).is_some());
    }
}
