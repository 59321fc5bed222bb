//! `waymark-infra` — shared mutable storage for entries and owners.
//!
//! The repository/index pairing is an injected, explicitly-owned component:
//! constructed once at process start and passed by reference (`Arc`) into the
//! service layer, never ambient global state.

pub mod directory;
pub mod repository;
pub mod spatial;

pub use directory::{DirectoryError, InMemoryOwnerDirectory, OwnerDirectory, OwnerRecord};
pub use repository::{EntryRepository, InMemoryEntryStore, RegionQuery, StoreError};
pub use spatial::LocationIndex;
