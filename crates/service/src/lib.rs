//! `waymark-service` — entry service orchestration.
//!
//! Receives a request (credential + operation + payload), consults the policy
//! engine, then drives the repository/spatial index pairing. Every request
//! walks the same ladder: authenticate, resolve the target where the
//! operation has one, check policy, apply — any failed rung short-circuits
//! with a typed reason and never partially applies.

pub mod error;
pub mod service;

pub use error::ServiceError;
pub use service::EntryService;
