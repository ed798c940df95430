//! Strongly-typed identifiers used across the domain.
//!
//! The marketplace is integer-keyed end to end, so these are thin newtypes
//! over `i64`. Keeping them distinct types prevents a subject id from being
//! handed to a tenant lookup (and vice versa) at compile time.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to parse an identifier from its textual form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {input}")]
pub struct IdError {
    kind: &'static str,
    input: String,
}

/// Identifier of an authenticated subject (account holder).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(i64);

/// Identifier of a tenant (the multi-tenant "agency" boundary).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(i64);

/// Identifier of a tenant membership record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(i64);

/// Identifier of an ownable resource (listing, post, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self).map_err(|_| IdError {
                    kind: $name,
                    input: s.to_string(),
                })
            }
        }
    };
}

impl_int_newtype!(SubjectId, "SubjectId");
impl_int_newtype!(TenantId, "TenantId");
impl_int_newtype!(MembershipId, "MembershipId");
impl_int_newtype!(ResourceId, "ResourceId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_decimal_text() {
        let id: SubjectId = "42".parse().unwrap();
        assert_eq!(id, SubjectId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_text() {
        let err = "abc".parse::<TenantId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid TenantId: abc");
    }

    #[test]
    fn ids_round_trip_through_i64() {
        let id = ResourceId::from(7);
        assert_eq!(i64::from(id), 7);
    }
}
