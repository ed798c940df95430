//! `agora-guard` — the request-scoped authentication/authorization pipeline.
//!
//! Turns a bearer credential into a verified identity, lazily resolves tenant
//! membership, validates status rules, and renders resource-level decisions.
//! Pure policy lives in `agora-auth`; this crate owns the IO-bearing
//! orchestration and the per-request state.

pub mod error;
pub mod extract;
pub mod identity;
pub mod pipeline;
pub mod tenant;

pub use error::GuardError;
pub use extract::{extract_credential, Credential, SESSION_COOKIE};
pub use identity::{IdentityBuilder, DEFAULT_IDENTITY_TTL};
pub use pipeline::{Authorized, GuardPipeline, OperationSpec, RequestContext, Verdict};
pub use tenant::TenantContextResolver;
