//! Postgres directory backend (sqlx).

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use agora_auth::{
    AccountStatus, CapabilitySet, MembershipStatus, OwnershipFacts, Role, TenantStatus,
};
use agora_core::{MembershipId, ResourceId, SubjectId, TenantId};

use super::r#trait::{Directory, Membership, Profile, StoreError, Tenant};

/// Postgres-backed directory.
#[derive(Debug, Clone)]
pub struct PgDirectory {
    pool: PgPool,
}

impl PgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a directory over a lazily-connected pool (no IO until first use).
    pub fn connect_lazy(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect_lazy(url)
            .map_err(query_err)?;
        Ok(Self { pool })
    }
}

fn query_err(err: sqlx::Error) -> StoreError {
    StoreError::Query(err.to_string())
}

fn decode_err(err: sqlx::Error) -> StoreError {
    StoreError::Decode(err.to_string())
}

fn role_from_db(value: &str) -> Result<Role, StoreError> {
    match value {
        "plain_user" => Ok(Role::PlainUser),
        "tenant_member" => Ok(Role::TenantMember),
        "tenant_owner" => Ok(Role::TenantOwner),
        other => Err(StoreError::Decode(format!("unknown role: {other}"))),
    }
}

fn account_status_from_db(value: &str) -> Result<AccountStatus, StoreError> {
    match value {
        "active" => Ok(AccountStatus::Active),
        "suspended" => Ok(AccountStatus::Suspended),
        other => Err(StoreError::Decode(format!("unknown account status: {other}"))),
    }
}

fn tenant_status_from_db(value: &str) -> Result<TenantStatus, StoreError> {
    match value {
        "active" => Ok(TenantStatus::Active),
        "inactive" => Ok(TenantStatus::Inactive),
        "suspended" => Ok(TenantStatus::Suspended),
        other => Err(StoreError::Decode(format!("unknown tenant status: {other}"))),
    }
}

fn membership_status_from_db(value: &str) -> Result<MembershipStatus, StoreError> {
    match value {
        "active" => Ok(MembershipStatus::Active),
        "inactive" => Ok(MembershipStatus::Inactive),
        "terminated" => Ok(MembershipStatus::Terminated),
        other => Err(StoreError::Decode(format!(
            "unknown membership status: {other}"
        ))),
    }
}

fn capability_flag(row: &PgRow, column: &str) -> Result<bool, StoreError> {
    row.try_get::<Option<bool>, _>(column)
        .map(|v| v.unwrap_or(false))
        .map_err(decode_err)
}

fn tenant_from_row(row: &PgRow) -> Result<Tenant, StoreError> {
    Ok(Tenant {
        id: TenantId::new(row.try_get::<i64, _>("id").map_err(decode_err)?),
        owner_id: SubjectId::new(row.try_get::<i64, _>("owner_id").map_err(decode_err)?),
        status: tenant_status_from_db(&row.try_get::<String, _>("status").map_err(decode_err)?)?,
    })
}

#[async_trait]
impl Directory for PgDirectory {
    async fn profile_by_subject(&self, subject: SubjectId) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query(
            "SELECT subject_id, role, account_status, email_verified, display_name \
             FROM profiles WHERE subject_id = $1",
        )
        .bind(subject.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        row.map(|row| {
            Ok(Profile {
                subject_id: SubjectId::new(
                    row.try_get::<i64, _>("subject_id").map_err(decode_err)?,
                ),
                role: role_from_db(&row.try_get::<String, _>("role").map_err(decode_err)?)?,
                account_status: account_status_from_db(
                    &row.try_get::<String, _>("account_status").map_err(decode_err)?,
                )?,
                email_verified: row.try_get::<bool, _>("email_verified").map_err(decode_err)?,
                display_name: row.try_get::<String, _>("display_name").map_err(decode_err)?,
            })
        })
        .transpose()
    }

    async fn membership_by_subject(
        &self,
        subject: SubjectId,
    ) -> Result<Option<Membership>, StoreError> {
        let row = sqlx::query(
            "SELECT m.id, m.subject_id, m.tenant_id, m.status, \
                    c.edit_own_post, c.edit_others_post, c.approve_requests, \
                    c.view_all_posts, c.delete_posts, c.manage_agents \
             FROM memberships m \
             LEFT JOIN membership_capabilities c ON c.membership_id = m.id \
             WHERE m.subject_id = $1",
        )
        .bind(subject.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        row.map(|row| {
            // No capability row joined: leave capabilities unset so the policy
            // layer applies the implicit default.
            let capabilities = match row
                .try_get::<Option<bool>, _>("edit_own_post")
                .map_err(decode_err)?
            {
                None => None,
                Some(edit_own_post) => Some(CapabilitySet {
                    edit_own_post,
                    edit_others_post: capability_flag(&row, "edit_others_post")?,
                    approve_requests: capability_flag(&row, "approve_requests")?,
                    view_all_posts: capability_flag(&row, "view_all_posts")?,
                    delete_posts: capability_flag(&row, "delete_posts")?,
                    manage_agents: capability_flag(&row, "manage_agents")?,
                }),
            };

            Ok(Membership {
                id: MembershipId::new(row.try_get::<i64, _>("id").map_err(decode_err)?),
                subject_id: SubjectId::new(
                    row.try_get::<i64, _>("subject_id").map_err(decode_err)?,
                ),
                tenant_id: TenantId::new(row.try_get::<i64, _>("tenant_id").map_err(decode_err)?),
                status: membership_status_from_db(
                    &row.try_get::<String, _>("status").map_err(decode_err)?,
                )?,
                capabilities,
            })
        })
        .transpose()
    }

    async fn tenant_by_id(&self, tenant: TenantId) -> Result<Option<Tenant>, StoreError> {
        let row = sqlx::query("SELECT id, owner_id, status FROM tenants WHERE id = $1")
            .bind(tenant.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;

        row.map(|row| tenant_from_row(&row)).transpose()
    }

    async fn tenant_by_owner(&self, owner: SubjectId) -> Result<Option<Tenant>, StoreError> {
        let row = sqlx::query("SELECT id, owner_id, status FROM tenants WHERE owner_id = $1")
            .bind(owner.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;

        row.map(|row| tenant_from_row(&row)).transpose()
    }

    async fn resource_ownership(
        &self,
        resource: ResourceId,
    ) -> Result<Option<OwnershipFacts>, StoreError> {
        let row = sqlx::query("SELECT owner_id, tenant_id FROM listings WHERE id = $1")
            .bind(resource.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;

        row.map(|row| {
            Ok(OwnershipFacts {
                owner_id: SubjectId::new(row.try_get::<i64, _>("owner_id").map_err(decode_err)?),
                tenant_id: row
                    .try_get::<Option<i64>, _>("tenant_id")
                    .map_err(decode_err)?
                    .map(TenantId::new),
            })
        })
        .transpose()
    }

    async fn touch_last_active(&self, subject: SubjectId) -> Result<(), StoreError> {
        sqlx::query("UPDATE profiles SET last_active_at = now() WHERE subject_id = $1")
            .bind(subject.get())
            .execute(&self.pool)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}
