//! Guard pipeline orchestration.
//!
//! Fixed stage order per operation, each stage either advancing the run or
//! terminating it:
//!
//! ```text
//! Unauthenticated -> Authenticated -> ContextResolved -> Authorized
//! ```
//!
//! Public operations terminate permissively before authentication. Every
//! failure is terminal with its category attached; no retries happen here.

use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;

use agora_auth::{
    authorize_resource, ensure_capability, validate_status, Capability, Denial, Identity,
    TenantContext, TokenVerifier,
};
use agora_core::ResourceId;
use agora_infra::{ContextCache, Directory};

use crate::error::GuardError;
use crate::extract::extract_credential;
use crate::identity::IdentityBuilder;
use crate::tenant::TenantContextResolver;

/// Per-operation metadata consulted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: &'static str,
    /// Public operations skip the guard entirely.
    pub public: bool,
    /// Whether the operation acts within a tenant and needs the context
    /// resolved.
    pub needs_tenant: bool,
    /// Capability the caller must hold (owners pass unconditionally).
    pub required_capability: Option<Capability>,
}

impl OperationSpec {
    pub const fn public(name: &'static str) -> Self {
        Self {
            name,
            public: true,
            needs_tenant: false,
            required_capability: None,
        }
    }

    pub const fn authenticated(name: &'static str) -> Self {
        Self {
            name,
            public: false,
            needs_tenant: false,
            required_capability: None,
        }
    }

    pub const fn tenant_scoped(name: &'static str) -> Self {
        Self {
            name,
            public: false,
            needs_tenant: true,
            required_capability: None,
        }
    }

    pub const fn with_capability(mut self, capability: Capability) -> Self {
        self.required_capability = Some(capability);
        self
    }
}

/// Mutable per-request state shared across pipeline invocations within the
/// same request lifecycle.
///
/// The identity is built once per request; the tenant context is resolved at
/// most once and reused by later invocations (resolution is skipped on the
/// memoized path, status validation never is).
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
    tenant: Option<TenantContext>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn tenant(&self) -> Option<&TenantContext> {
        self.tenant.as_ref()
    }
}

/// Successful pipeline outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Public operation: the guard never ran, nothing is known about the
    /// caller.
    Public,
    Granted(Authorized),
}

/// What a granted run learned about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    pub identity: Identity,
    pub tenant: Option<TenantContext>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    Authenticated,
    ContextResolved,
    Authorized,
}

impl GuardState {
    fn as_str(self) -> &'static str {
        match self {
            GuardState::Authenticated => "authenticated",
            GuardState::ContextResolved => "context_resolved",
            GuardState::Authorized => "authorized",
        }
    }
}

fn transition(operation: &OperationSpec, state: GuardState) {
    tracing::debug!(operation = operation.name, state = state.as_str(), "guard transition");
}

/// The orchestrator: wire it once at startup, call it per operation.
pub struct GuardPipeline {
    verifier: Arc<dyn TokenVerifier>,
    identities: IdentityBuilder,
    tenants: TenantContextResolver,
    directory: Arc<dyn Directory>,
}

impl GuardPipeline {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        directory: Arc<dyn Directory>,
        cache: Arc<dyn ContextCache>,
    ) -> Self {
        Self {
            identities: IdentityBuilder::new(Arc::clone(&directory), cache),
            tenants: TenantContextResolver::new(Arc::clone(&directory)),
            verifier,
            directory,
        }
    }

    pub fn with_identity_ttl(mut self, ttl: Duration) -> Self {
        self.identities = self.identities.with_ttl(ttl);
        self
    }

    /// The identity builder, exposed so credential-affecting mutations can
    /// invalidate cached identities.
    pub fn identities(&self) -> &IdentityBuilder {
        &self.identities
    }

    /// Run the pipeline for one operation.
    ///
    /// `resource` names the target for resource-scoped operations; operations
    /// without a target go straight from context validation to the terminal
    /// success state.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        operation: &OperationSpec,
        resource: Option<ResourceId>,
        request: &mut RequestContext,
    ) -> Result<Verdict, GuardError> {
        if operation.public {
            tracing::debug!(operation = operation.name, "public operation, guard skipped");
            return Ok(Verdict::Public);
        }

        let identity = match request.identity.clone() {
            Some(identity) => identity,
            None => {
                let credential = extract_credential(headers)
                    .ok_or(GuardError::Denied(Denial::InvalidCredential))?;
                let verified = self.verifier.verify(credential.as_str())?;
                let identity = self.identities.build(verified.subject_id).await?;
                request.identity = Some(identity.clone());
                identity
            }
        };
        transition(operation, GuardState::Authenticated);

        // Account-level rules apply to every operation, tenant-scoped or not.
        validate_status(&identity, None)?;

        let tenant = if operation.needs_tenant {
            let context = match request.tenant.clone() {
                Some(context) => Some(context),
                None => {
                    let resolved = self.tenants.resolve(&identity).await?;
                    request.tenant = resolved.clone();
                    resolved
                }
            };
            // Runs on the freshly-resolved and the memoized path alike.
            validate_status(&identity, context.as_ref())?;
            context
        } else {
            None
        };
        transition(operation, GuardState::ContextResolved);

        if let Some(capability) = operation.required_capability {
            ensure_capability(&identity, tenant.as_ref(), capability)?;
        }

        if let Some(resource) = resource {
            let facts = self
                .directory
                .resource_ownership(resource)
                .await?
                .ok_or(GuardError::Denied(Denial::ResourceNotFound))?;
            authorize_resource(&identity, tenant.as_ref(), &facts)?;
        }
        transition(operation, GuardState::Authorized);

        Ok(Verdict::Granted(Authorized { identity, tenant }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
