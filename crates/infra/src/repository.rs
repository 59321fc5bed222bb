//! Entry storage: repository contract plus the in-memory implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use waymark_core::{DomainError, DomainResult, EntryId, IdentityId, Region};
use waymark_entries::Entry;

use crate::spatial::LocationIndex;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("entry not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    /// A delete check rejected the current record.
    #[error("precondition failed")]
    PreconditionFailed,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Authoritative store of entries, keyed by entry id.
///
/// The repository enforces entry invariants defensively on every write
/// (missing required fields, weight <= 0) but never authorization — that is
/// strictly the policy engine's job.
///
/// Mutations are atomic per id: `mutate` runs the caller's closure while
/// holding the store's write lock, so two concurrent updates to the same id
/// can never interleave field-by-field, and a failed closure leaves the
/// stored entry untouched.
pub trait EntryRepository: Send + Sync {
    fn create(&self, entry: Entry) -> Result<EntryId, StoreError>;

    fn get(&self, id: EntryId) -> Result<Entry, StoreError>;

    /// Point-in-time snapshot of all entries. Callers may stop iterating
    /// early; iteration never holds the store lock.
    fn list_all(&self) -> Result<Vec<Entry>, StoreError>;

    fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Entry>, StoreError>;

    /// Apply `mutation` to the entry under the store's write lock and return
    /// the updated entry. A mutation error rolls the whole operation back.
    fn mutate(
        &self,
        id: EntryId,
        mutation: &mut dyn FnMut(&mut Entry) -> DomainResult<()>,
    ) -> Result<Entry, StoreError>;

    /// Remove and return the entry. `check` runs against the current record
    /// inside the write section, so a decision taken on an earlier read
    /// cannot be applied to an entry that changed in between; a `false`
    /// aborts the removal with [`StoreError::PreconditionFailed`].
    fn delete(
        &self,
        id: EntryId,
        check: &mut dyn FnMut(&Entry) -> bool,
    ) -> Result<Entry, StoreError>;
}

/// Region containment lookup over stored entry locations.
pub trait RegionQuery: Send + Sync {
    /// Exactly the stored entries whose location lies inside `region`
    /// (inclusive bounds), stable for a given store state.
    fn query(&self, region: Region) -> Result<Vec<Entry>, StoreError>;
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<EntryId, Entry>,
    index: LocationIndex,
}

/// In-memory entry store.
///
/// Entries and the location index live behind one `RwLock`: a write section
/// updates both before releasing, so there is no window where an entry is
/// persisted but not yet queryable by location (or vice versa), and an
/// abandoned request cannot leave the pair half-applied.
#[derive(Debug, Default)]
pub struct InMemoryEntryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntryRepository for InMemoryEntryStore {
    fn create(&self, entry: Entry) -> Result<EntryId, StoreError> {
        entry.validate()?;

        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let id = entry.id();
        if inner.entries.contains_key(&id) {
            return Err(StoreError::Conflict(format!("entry {id} already exists")));
        }
        inner.index.insert(id, entry.location());
        inner.entries.insert(id, entry);
        Ok(id)
    }

    fn get(&self, id: EntryId) -> Result<Entry, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        inner.entries.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn list_all(&self) -> Result<Vec<Entry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut entries: Vec<Entry> = inner.entries.values().cloned().collect();
        entries.sort_by_key(Entry::id);
        Ok(entries)
    }

    fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Entry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let mut entries: Vec<Entry> = inner
            .entries
            .values()
            .filter(|e| e.owner_id() == owner)
            .cloned()
            .collect();
        entries.sort_by_key(Entry::id);
        Ok(entries)
    }

    fn mutate(
        &self,
        id: EntryId,
        mutation: &mut dyn FnMut(&mut Entry) -> DomainResult<()>,
    ) -> Result<Entry, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let current = inner.entries.get(&id).ok_or(StoreError::NotFound)?;

        // Mutate a copy; the stored entry is only replaced on success.
        let mut next = current.clone();
        mutation(&mut next)?;
        next.validate()?;

        inner.index.insert(id, next.location());
        inner.entries.insert(id, next.clone());
        Ok(next)
    }

    fn delete(
        &self,
        id: EntryId,
        check: &mut dyn FnMut(&Entry) -> bool,
    ) -> Result<Entry, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let current = inner.entries.get(&id).ok_or(StoreError::NotFound)?;
        if !check(current) {
            return Err(StoreError::PreconditionFailed);
        }
        let removed = inner.entries.remove(&id).ok_or(StoreError::NotFound)?;
        inner.index.remove(id);
        Ok(removed)
    }
}

impl RegionQuery for InMemoryEntryStore {
    fn query(&self, region: Region) -> Result<Vec<Entry>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let entries = inner
            .index
            .query(&region)
            .into_iter()
            .filter_map(|id| inner.entries.get(&id).cloned())
            .collect();
        Ok(entries)
    }
}
