//! Backing lookups consumed by the guard pipeline.
//!
//! The trait makes no storage assumptions; backends live in sibling modules.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDirectory;
pub use postgres::PgDirectory;
pub use r#trait::{Directory, Membership, Profile, StoreError, Tenant};
