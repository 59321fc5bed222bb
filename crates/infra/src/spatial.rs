//! Spatial index over entry locations.
//!
//! [`LocationIndex`] is the correct-but-naive O(n) baseline: a flat map of
//! entry id to coordinate, scanned per query. The interface (insert / remove
//! / query over a [`Region`]) is what callers depend on, so an R-tree or
//! grid index can be substituted later without touching them.

use std::collections::HashMap;

use waymark_core::{EntryId, GeoPoint, Region};

/// In-memory location index.
///
/// Not thread-safe by itself: the owning store guards it together with the
/// entry map under a single lock, which is what keeps "entry persisted" and
/// "entry queryable by location" from ever diverging.
#[derive(Debug, Default)]
pub struct LocationIndex {
    points: HashMap<EntryId, GeoPoint>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move an entry's location.
    pub fn insert(&mut self, id: EntryId, point: GeoPoint) {
        self.points.insert(id, point);
    }

    /// Drop an entry from the index.
    pub fn remove(&mut self, id: EntryId) -> Option<GeoPoint> {
        self.points.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Ids of all entries whose location falls inside `region` (inclusive of
    /// the boundary).
    ///
    /// Sorted by id so the same index state always yields the same sequence.
    pub fn query(&self, region: &Region) -> Vec<EntryId> {
        let mut hits: Vec<EntryId> = self
            .points
            .iter()
            .filter(|(_, point)| region.contains(**point))
            .map(|(id, _)| *id)
            .collect();
        hits.sort();
        hits
    }
}
