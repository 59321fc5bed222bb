//! `waymark-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage. It owns two
//! things: turning an opaque bearer credential into an [`Identity`], and the
//! pure policy decision consulted before every ownership-sensitive operation.

pub mod claims;
pub mod identity;
pub mod policy;
pub mod roles;
pub mod verifier;

pub use claims::{AccessClaims, TokenValidationError, validate_claims};
pub use identity::Identity;
pub use policy::{Decision, DenyReason, OperationKind, decide};
pub use roles::Role;
pub use verifier::{CredentialVerifier, Hs256Verifier, VerifyError};
