use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::{AccessClaims, Identity, validate_claims};

/// Credential verification failure.
///
/// Deliberately a single opaque variant: callers must treat a malformed,
/// unsigned, or expired credential identically, so the error carries no hint
/// of which check failed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    #[error("unauthenticated")]
    Unauthenticated,
}

/// Turns an opaque bearer credential into an [`Identity`].
///
/// Implementations must be stateless and side-effect-free; verification is
/// local/offline (no network round-trip).
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, VerifyError>;
}

/// HS256 verifier over [`AccessClaims`].
///
/// Signature check via `jsonwebtoken`, then the deterministic claims-window
/// validation from [`crate::claims`]. The library's numeric-`exp` validation
/// is disabled because claims carry RFC 3339 timestamps; the window check
/// here replaces it.
pub struct Hs256Verifier {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256Verifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl CredentialVerifier for Hs256Verifier {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, VerifyError> {
        let decoded = jsonwebtoken::decode::<AccessClaims>(token, &self.key, &self.validation)
            .map_err(|_| VerifyError::Unauthenticated)?;

        let claims = decoded.claims;
        validate_claims(&claims, now).map_err(|_| VerifyError::Unauthenticated)?;

        Ok(Identity {
            id: claims.sub,
            display_name: claims.display_name,
            email: claims.email,
            role: claims.role,
        })
    }
}
