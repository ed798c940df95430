//! Pipeline failure model.

use thiserror::Error;

use agora_auth::Denial;
use agora_infra::{CacheError, StoreError};

/// Terminal failure of a guard pipeline run.
///
/// `Denied` carries the authorization taxonomy and surfaces to the caller as
/// a denial with its category attached. The remaining variants are
/// infrastructure/internal failures, deliberately kept outside the taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error(transparent)]
    Denied(#[from] Denial),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("cache failure: {0}")]
    Cache(#[from] CacheError),

    /// The directory contradicts itself (e.g. a membership pointing at a
    /// tenant that no longer exists). Not a denial: no taxonomy category fits
    /// a caller whose records are valid but whose tenant row vanished.
    #[error("directory inconsistency: {0}")]
    Inconsistent(String),
}

impl GuardError {
    /// The denial category, when this failure is one.
    pub fn denial(&self) -> Option<Denial> {
        match self {
            GuardError::Denied(denial) => Some(*denial),
            _ => None,
        }
    }
}
