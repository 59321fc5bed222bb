//! `waymark-entries` — the geotagged entry domain model.

pub mod entry;

pub use entry::{Entry, EntryDraft, EntryPatch, OwnerSnapshot};
