//! Bearer token verification (local, stateless).
//!
//! The credential is an opaque signed token carrying a subject id (`sub`) and
//! a unique token id (`jti`, used for revocation bookkeeping elsewhere).
//! Verification never leaves the process: no network, no store.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use agora_core::SubjectId;

use crate::denial::Denial;

/// Claims embedded in the signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier.
    pub sub: i64,
    /// Unique token identifier.
    pub jti: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject_id: SubjectId,
    pub token_id: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("token signing failed")]
pub struct SignError;

/// Verifier boundary consumed by the guard pipeline.
///
/// Every failure mode — bad signature, malformed payload, expiry, missing
/// claim — collapses into `Denial::InvalidCredential` so verification
/// internals never leak to callers.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedToken, Denial>;
}

/// HS256 shared-secret verifier (and issuer, for login surfaces and tests).
pub struct Hs256TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Sign a token for a subject with the given lifetime.
    pub fn sign_for(
        &self,
        subject: SubjectId,
        token_id: impl Into<String>,
        ttl: Duration,
    ) -> Result<String, SignError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.get(),
            jti: token_id.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| SignError)
    }
}

impl TokenVerifier for Hs256TokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedToken, Denial> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation).map_err(
            |err| {
                tracing::debug!(error = %err, "token verification failed");
                Denial::InvalidCredential
            },
        )?;

        Ok(VerifiedToken {
            subject_id: SubjectId::new(data.claims.sub),
            token_id: data.claims.jti,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> Hs256TokenVerifier {
        Hs256TokenVerifier::new(b"test-secret")
    }

    #[test]
    fn verifies_a_freshly_signed_token() {
        let v = verifier();
        let token = v
            .sign_for(SubjectId::new(42), "tok-1", Duration::hours(1))
            .unwrap();

        let verified = v.verify(&token).unwrap();
        assert_eq!(verified.subject_id, SubjectId::new(42));
        assert_eq!(verified.token_id, "tok-1");
    }

    #[test]
    fn expired_token_collapses_to_invalid_credential() {
        let v = verifier();
        let token = v
            .sign_for(SubjectId::new(42), "tok-2", Duration::hours(-2))
            .unwrap();

        assert_eq!(v.verify(&token), Err(Denial::InvalidCredential));
    }

    #[test]
    fn garbage_collapses_to_invalid_credential() {
        let v = verifier();
        assert_eq!(v.verify("not-a-token"), Err(Denial::InvalidCredential));
        assert_eq!(v.verify(""), Err(Denial::InvalidCredential));
    }

    #[test]
    fn wrong_secret_collapses_to_invalid_credential() {
        let signer = Hs256TokenVerifier::new(b"secret-a");
        let token = signer
            .sign_for(SubjectId::new(42), "tok-3", Duration::hours(1))
            .unwrap();

        let other = Hs256TokenVerifier::new(b"secret-b");
        assert_eq!(other.verify(&token), Err(Denial::InvalidCredential));
    }
}
