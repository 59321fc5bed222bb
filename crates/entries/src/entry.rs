use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use waymark_core::{DomainError, DomainResult, EntryId, GeoPoint, IdentityId};

/// Denormalized copy of owner display fields, captured at entry write time.
///
/// This is *not* a live reference into the account store: display name and
/// email may drift after the snapshot is taken, and that drift is expected
/// and acceptable. Reads resolve current display fields from the account
/// collaborator instead of trusting this copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSnapshot {
    pub id: IdentityId,
    pub display_name: String,
    pub email: String,
}

/// Fields supplied when creating an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub name: String,
    pub weight: f64,
    pub birthdate: NaiveDate,
    pub location: GeoPoint,
    /// Opaque reference into the blob collaborator; never interpreted here.
    pub image_ref: Option<String>,
}

/// Partial replacement of editable fields.
///
/// Never carries the entry id or an owner reference — ownership changes only
/// through the admin reassignment path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub birthdate: Option<NaiveDate>,
    pub location: Option<GeoPoint>,
    /// Outer `None` leaves the reference untouched; `Some(None)` clears it.
    pub image_ref: Option<Option<String>>,
}

/// A geotagged owned resource record.
///
/// # Invariants
/// - `id` is assigned at creation and immutable.
/// - `owner_id` is set exactly once at creation; only the admin reassignment
///   path may change it afterwards.
/// - `weight` is finite and strictly positive.
/// - `name` is non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    id: EntryId,
    name: String,
    weight: f64,
    birthdate: NaiveDate,
    location: GeoPoint,
    owner_id: IdentityId,
    owner: OwnerSnapshot,
    image_ref: Option<String>,
}

impl Entry {
    /// Create a new entry owned by the identity behind `owner`.
    pub fn create(id: EntryId, draft: EntryDraft, owner: OwnerSnapshot) -> DomainResult<Self> {
        let entry = Self {
            id,
            name: draft.name,
            weight: draft.weight,
            birthdate: draft.birthdate,
            location: draft.location,
            owner_id: owner.id,
            owner,
            image_ref: draft.image_ref,
        };
        entry.check_invariants()?;
        Ok(entry)
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn birthdate(&self) -> NaiveDate {
        self.birthdate
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn owner_id(&self) -> IdentityId {
        self.owner_id
    }

    pub fn owner(&self) -> &OwnerSnapshot {
        &self.owner
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Replace editable fields from `patch`. The id and owner are never
    /// touched here.
    pub fn apply_patch(&mut self, patch: &EntryPatch) -> DomainResult<()> {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(weight) = patch.weight {
            next.weight = weight;
        }
        if let Some(birthdate) = patch.birthdate {
            next.birthdate = birthdate;
        }
        if let Some(location) = patch.location {
            next.location = location;
        }
        if let Some(image_ref) = &patch.image_ref {
            next.image_ref = image_ref.clone();
        }
        next.check_invariants()?;
        *self = next;
        Ok(())
    }

    /// Admin-only path: hand the entry to a different owner, refreshing the
    /// write-time snapshot.
    pub fn reassign_owner(&mut self, owner: OwnerSnapshot) {
        self.owner_id = owner.id;
        self.owner = owner;
    }

    /// Refresh the snapshot for the *current* owner (non-admin update path:
    /// the mutating operation re-embeds the caller's display fields).
    pub fn refresh_owner_snapshot(&mut self, owner: OwnerSnapshot) -> DomainResult<()> {
        if owner.id != self.owner_id {
            return Err(DomainError::invariant(
                "snapshot refresh must not change the owner",
            ));
        }
        self.owner = owner;
        Ok(())
    }

    fn check_invariants(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(DomainError::validation(format!(
                "weight must be a positive number, got {}",
                self.weight
            )));
        }
        if self.owner_id != self.owner.id {
            return Err(DomainError::invariant(
                "owner snapshot does not match owner_id",
            ));
        }
        // GeoPoint has public fields and deserializes without going through
        // its constructor, so re-run the full range checks here.
        GeoPoint::new(self.location.latitude, self.location.longitude)?;
        Ok(())
    }

    /// Re-run the entry invariants (used by the repository's defensive
    /// write-side validation).
    pub fn validate(&self) -> DomainResult<()> {
        self.check_invariants()
    }
}
