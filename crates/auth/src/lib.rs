//! `agora-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: everything in
//! here is deterministic policy over already-loaded data, plus local token
//! cryptography. IO-bearing resolution lives in `agora-guard`.

pub mod capabilities;
pub mod denial;
pub mod identity;
pub mod resource;
pub mod status;
pub mod tenant;
pub mod token;

pub use capabilities::{Capability, CapabilitySet};
pub use denial::Denial;
pub use identity::{AccountStatus, Identity, Role};
pub use resource::{authorize_resource, ensure_capability, OwnershipFacts};
pub use status::validate_status;
pub use tenant::{MembershipStatus, TenantContext, TenantStatus};
pub use token::{Hs256TokenVerifier, SignError, TokenVerifier, VerifiedToken};
