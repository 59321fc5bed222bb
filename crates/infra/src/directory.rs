//! Owner directory: the account-store collaborator.
//!
//! This core never owns identities; it only needs to resolve an owner id to
//! current display fields at read time, and to surface uniqueness conflicts
//! the account store raises during create. The in-memory implementation
//! exists for tests/dev and as the wiring default.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use waymark_core::IdentityId;

/// Current account record for an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub id: IdentityId,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Uniqueness violation at the account store (e.g. duplicate email).
    /// Propagated to callers unchanged.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("directory lock poisoned")]
    Poisoned,
}

pub trait OwnerDirectory: Send + Sync {
    /// Upsert the record for `record.id`. Fails with [`DirectoryError::Conflict`]
    /// when the email is already bound to a different identity.
    fn register(&self, record: OwnerRecord) -> Result<(), DirectoryError>;

    /// Current display fields for an owner, or `None` when the account is
    /// gone (the corrupt-owner case listings must exclude).
    fn resolve(&self, id: IdentityId) -> Result<Option<OwnerRecord>, DirectoryError>;

    /// Drop an account. Mainly here so tests can manufacture entries whose
    /// owner no longer resolves.
    fn remove(&self, id: IdentityId) -> Result<(), DirectoryError>;
}

/// In-memory owner directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOwnerDirectory {
    inner: RwLock<HashMap<IdentityId, OwnerRecord>>,
}

impl InMemoryOwnerDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OwnerDirectory for InMemoryOwnerDirectory {
    fn register(&self, record: OwnerRecord) -> Result<(), DirectoryError> {
        let mut map = self.inner.write().map_err(|_| DirectoryError::Poisoned)?;
        let taken = map
            .values()
            .any(|r| r.email == record.email && r.id != record.id);
        if taken {
            return Err(DirectoryError::Conflict(format!(
                "email {} is already registered",
                record.email
            )));
        }
        map.insert(record.id, record);
        Ok(())
    }

    fn resolve(&self, id: IdentityId) -> Result<Option<OwnerRecord>, DirectoryError> {
        let map = self.inner.read().map_err(|_| DirectoryError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn remove(&self, id: IdentityId) -> Result<(), DirectoryError> {
        let mut map = self.inner.write().map_err(|_| DirectoryError::Poisoned)?;
        map.remove(&id);
        Ok(())
    }
}
