//! Typed failure surface of the entry service.

use thiserror::Error;

use waymark_auth::{DenyReason, VerifyError};
use waymark_core::DomainError;
use waymark_infra::{DirectoryError, StoreError};

/// Policy outcomes and faults returned to the caller layer.
///
/// These are surfaced as-is: no recovery or retry happens inside the core.
/// `Internal` is the one non-policy variant, reserved for infrastructure
/// faults (a poisoned lock) that the taxonomy otherwise has no word for.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No or invalid credential.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Authenticated but not permitted.
    #[error("forbidden")]
    Forbidden,

    /// Target id absent (or target in a corrupt, unreturnable state).
    #[error("not found")]
    NotFound,

    /// Malformed input fields.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Uniqueness violation raised by a collaborator; propagated unchanged.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            DomainError::NotFound => ServiceError::NotFound,
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServiceError::NotFound,
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            // A failed delete check means the record no longer satisfies the
            // caller's permission; without more context this is a denial.
            StoreError::PreconditionFailed => ServiceError::Forbidden,
            StoreError::Domain(e) => e.into(),
            StoreError::Poisoned => ServiceError::Internal("store lock poisoned".to_string()),
        }
    }
}

impl From<DirectoryError> for ServiceError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Conflict(msg) => ServiceError::Conflict(msg),
            DirectoryError::Poisoned => {
                ServiceError::Internal("directory lock poisoned".to_string())
            }
        }
    }
}

impl From<VerifyError> for ServiceError {
    fn from(_: VerifyError) -> Self {
        ServiceError::Unauthenticated
    }
}

impl From<DenyReason> for ServiceError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => ServiceError::Unauthenticated,
            DenyReason::Forbidden => ServiceError::Forbidden,
        }
    }
}
