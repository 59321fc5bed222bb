use std::sync::Arc;

use chrono::Utc;

use waymark_auth::{
    CredentialVerifier, Decision, Identity, OperationKind, decide,
};
use waymark_core::{EntryId, GeoPoint, IdentityId, Region};
use waymark_entries::{Entry, EntryDraft, EntryPatch, OwnerSnapshot};
use waymark_infra::{EntryRepository, OwnerDirectory, OwnerRecord, RegionQuery, StoreError};

use crate::ServiceError;

/// Orchestrates verifier, policy engine, repository/index, and the owner
/// directory. Holds no request state of its own; the injected collaborators
/// are the only shared mutable pieces.
pub struct EntryService<S, D, V>
where
    S: EntryRepository + RegionQuery,
    D: OwnerDirectory,
    V: CredentialVerifier,
{
    store: Arc<S>,
    directory: Arc<D>,
    verifier: Arc<V>,
}

impl<S, D, V> EntryService<S, D, V>
where
    S: EntryRepository + RegionQuery,
    D: OwnerDirectory,
    V: CredentialVerifier,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, verifier: Arc<V>) -> Self {
        Self {
            store,
            directory,
            verifier,
        }
    }

    /// Validate a bearer credential and return the identity behind it.
    pub fn authenticate(&self, credential: &str) -> Result<Identity, ServiceError> {
        Ok(self.verifier.verify(credential, Utc::now())?)
    }

    /// Create an entry owned by the caller.
    ///
    /// The caller's display fields are embedded as a write-time owner
    /// snapshot, and the caller is registered with the owner directory — a
    /// uniqueness conflict raised there propagates unchanged.
    pub fn create_entry(
        &self,
        credential: &str,
        draft: EntryDraft,
    ) -> Result<Entry, ServiceError> {
        let identity = self.authenticate(credential)?;

        if let Decision::Deny(reason) = decide(Some(&identity), OperationKind::Create, None) {
            return Err(reason.into());
        }

        self.directory.register(OwnerRecord {
            id: identity.id,
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
        })?;

        let snapshot = OwnerSnapshot {
            id: identity.id,
            display_name: identity.display_name,
            email: identity.email,
        };
        let entry = Entry::create(EntryId::new(), draft, snapshot)?;
        let id = self.store.create(entry.clone())?;
        tracing::debug!(entry = %id, owner = %entry.owner_id(), "entry created");
        Ok(entry)
    }

    /// Read a single entry; owner display fields are resolved at read time.
    pub fn get_entry(&self, id: EntryId) -> Result<Entry, ServiceError> {
        let entry = self.store.get(id)?;
        match self.resolve_owner(entry)? {
            Some(entry) => Ok(entry),
            None => {
                tracing::warn!(entry = %id, "entry owner does not resolve, treating as absent");
                Err(ServiceError::NotFound)
            }
        }
    }

    /// All entries, excluding any whose owner no longer resolves (corrupt
    /// state is dropped from the output, never returned as a partial record).
    pub fn list_entries(&self) -> Result<Vec<Entry>, ServiceError> {
        let entries = self.store.list_all()?;
        self.resolve_owners(entries)
    }

    /// Entries owned by the caller.
    pub fn list_entries_by_owner(&self, credential: &str) -> Result<Vec<Entry>, ServiceError> {
        let identity = self.authenticate(credential)?;
        let entries = self.store.list_by_owner(identity.id)?;
        self.resolve_owners(entries)
    }

    /// Replace editable fields of an entry.
    ///
    /// Existence is resolved before policy: a missing id is `NotFound` for
    /// every caller, authenticated or not, so probing mutations learn nothing
    /// beyond whether the id exists. On the non-admin path the caller must
    /// own the entry and its owner snapshot is re-embedded; the admin path is
    /// unconditional for administrators.
    pub fn update_entry(
        &self,
        credential: Option<&str>,
        id: EntryId,
        patch: EntryPatch,
        as_admin: bool,
    ) -> Result<Entry, ServiceError> {
        let caller = self.resolve_caller(credential);
        let target = self.resolve_target(id)?;

        match decide(
            caller.as_ref(),
            OperationKind::Update { as_admin },
            Some(target.owner_id()),
        ) {
            Decision::Allow => {}
            Decision::Deny(reason) => {
                tracing::debug!(entry = %id, as_admin, ?reason, "update denied");
                return Err(reason.into());
            }
        }

        // On the non-admin path the allow decision guarantees caller == owner.
        let snapshot = if as_admin {
            None
        } else {
            caller.map(|identity| OwnerSnapshot {
                id: identity.id,
                display_name: identity.display_name,
                email: identity.email,
            })
        };

        let updated = self.store.mutate(id, &mut |entry| {
            entry.apply_patch(&patch)?;
            if let Some(snapshot) = &snapshot {
                entry.refresh_owner_snapshot(snapshot.clone())?;
            }
            Ok(())
        })?;
        tracing::debug!(entry = %id, as_admin, "entry updated");
        Ok(updated)
    }

    /// Admin path only: hand the entry to a different owner.
    ///
    /// The new owner must resolve in the directory; its current display
    /// fields become the entry's fresh write-time snapshot.
    pub fn reassign_owner(
        &self,
        credential: Option<&str>,
        id: EntryId,
        new_owner: IdentityId,
    ) -> Result<Entry, ServiceError> {
        let caller = self.resolve_caller(credential);
        let target = self.resolve_target(id)?;

        match decide(
            caller.as_ref(),
            OperationKind::Update { as_admin: true },
            Some(target.owner_id()),
        ) {
            Decision::Allow => {}
            Decision::Deny(reason) => return Err(reason.into()),
        }

        let record = self
            .directory
            .resolve(new_owner)?
            .ok_or_else(|| ServiceError::Validation(format!("unknown owner identity {new_owner}")))?;

        let updated = self.store.mutate(id, &mut |entry| {
            entry.reassign_owner(OwnerSnapshot {
                id: record.id,
                display_name: record.display_name.clone(),
                email: record.email.clone(),
            });
            Ok(())
        })?;
        tracing::debug!(entry = %id, new_owner = %new_owner, "entry owner reassigned");
        Ok(updated)
    }

    /// Delete an entry; returns the removed record.
    pub fn delete_entry(
        &self,
        credential: Option<&str>,
        id: EntryId,
        as_admin: bool,
    ) -> Result<Entry, ServiceError> {
        let caller = self.resolve_caller(credential);
        let target = self.resolve_target(id)?;

        match decide(
            caller.as_ref(),
            OperationKind::Delete { as_admin },
            Some(target.owner_id()),
        ) {
            Decision::Allow => {}
            Decision::Deny(reason) => {
                tracing::debug!(entry = %id, as_admin, ?reason, "delete denied");
                return Err(reason.into());
            }
        }

        // The decision above was taken on a separate read; the store re-runs
        // it against the record it actually holds, so an owner reassignment
        // landing in between cannot let the former owner through.
        let removed = self
            .store
            .delete(id, &mut |entry| {
                matches!(
                    decide(
                        caller.as_ref(),
                        OperationKind::Delete { as_admin },
                        Some(entry.owner_id()),
                    ),
                    Decision::Allow
                )
            })
            .map_err(|err| match err {
                StoreError::PreconditionFailed => ServiceError::Forbidden,
                other => other.into(),
            })?;
        tracing::debug!(entry = %id, as_admin, "entry deleted");
        Ok(removed)
    }

    /// Entries inside the rectangle spanned by two opposite corners, supplied
    /// in any order. Open to anonymous callers.
    pub fn query_region(
        &self,
        corner_a: GeoPoint,
        corner_b: GeoPoint,
    ) -> Result<Vec<Entry>, ServiceError> {
        let region = Region::from_corners(corner_a, corner_b);
        let entries = self.store.query(region)?;
        self.resolve_owners(entries)
    }

    /// Derive the caller state for a mutating operation. An invalid
    /// credential behaves exactly like an absent one — the policy engine
    /// answers `Unauthenticated` for both, so credential validity cannot be
    /// probed through mutation attempts.
    fn resolve_caller(&self, credential: Option<&str>) -> Option<Identity> {
        let token = credential?;
        self.verifier.verify(token, Utc::now()).ok()
    }

    /// Existence resolution for ownership-gated operations. `NotFound` here
    /// strictly precedes any policy evaluation.
    fn resolve_target(&self, id: EntryId) -> Result<Entry, ServiceError> {
        match self.store.get(id) {
            Ok(entry) => Ok(entry),
            Err(StoreError::NotFound) => Err(ServiceError::NotFound),
            Err(other) => Err(other.into()),
        }
    }

    /// Swap the write-time owner snapshot for current directory fields, or
    /// `None` when the owner no longer resolves.
    fn resolve_owner(&self, mut entry: Entry) -> Result<Option<Entry>, ServiceError> {
        let Some(record) = self.directory.resolve(entry.owner_id())? else {
            return Ok(None);
        };
        entry.refresh_owner_snapshot(OwnerSnapshot {
            id: record.id,
            display_name: record.display_name,
            email: record.email,
        })?;
        Ok(Some(entry))
    }

    fn resolve_owners(&self, entries: Vec<Entry>) -> Result<Vec<Entry>, ServiceError> {
        let mut resolved = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = entry.id();
            match self.resolve_owner(entry)? {
                Some(entry) => resolved.push(entry),
                None => {
                    tracing::warn!(entry = %id, "skipping entry with unresolvable owner");
                }
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chrono::{DateTime, NaiveDate};
    use waymark_auth::{Role, VerifyError};
    use waymark_infra::{InMemoryEntryStore, InMemoryOwnerDirectory};

    /// Test double for the credential verifier: maps fixed token strings to
    /// identities, everything else is unauthenticated.
    struct StaticVerifier {
        tokens: HashMap<String, Identity>,
    }

    impl CredentialVerifier for StaticVerifier {
        fn verify(
            &self,
            token: &str,
            _now: DateTime<Utc>,
        ) -> Result<Identity, VerifyError> {
            self.tokens
                .get(token)
                .cloned()
                .ok_or(VerifyError::Unauthenticated)
        }
    }

    struct Harness {
        service: EntryService<InMemoryEntryStore, InMemoryOwnerDirectory, StaticVerifier>,
        directory: Arc<InMemoryOwnerDirectory>,
        u1: Identity,
        u2: Identity,
        admin: Identity,
    }

    const T_U1: &str = "token-u1";
    const T_U2: &str = "token-u2";
    const T_ADMIN: &str = "token-admin";

    fn identity(name: &str, email: &str, role: Role) -> Identity {
        Identity {
            id: IdentityId::new(),
            display_name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }

    fn harness() -> Harness {
        let u1 = identity("Uma User", "uma@example.com", Role::Standard);
        let u2 = identity("Ville User", "ville@example.com", Role::Standard);
        let admin = identity("Aino Admin", "aino@example.com", Role::Administrator);

        let mut tokens = HashMap::new();
        tokens.insert(T_U1.to_string(), u1.clone());
        tokens.insert(T_U2.to_string(), u2.clone());
        tokens.insert(T_ADMIN.to_string(), admin.clone());

        let store = Arc::new(InMemoryEntryStore::new());
        let directory = Arc::new(InMemoryOwnerDirectory::new());
        let service = EntryService::new(
            store,
            Arc::clone(&directory),
            Arc::new(StaticVerifier { tokens }),
        );

        Harness {
            service,
            directory,
            u1,
            u2,
            admin,
        }
    }

    fn milo_draft() -> EntryDraft {
        EntryDraft {
            name: "Milo".to_string(),
            weight: 4.2,
            birthdate: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            location: GeoPoint::new(60.0, 24.9).unwrap(),
            image_ref: None,
        }
    }

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    // Scenario A: create as U1, owner snapshot = U1, get returns it.
    #[test]
    fn create_embeds_the_callers_owner_snapshot() {
        let h = harness();
        let created = h.service.create_entry(T_U1, milo_draft()).unwrap();

        assert_eq!(created.owner_id(), h.u1.id);
        assert_eq!(created.owner().display_name, "Uma User");
        assert_eq!(created.owner().email, "uma@example.com");

        let fetched = h.service.get_entry(created.id()).unwrap();
        assert_eq!(fetched.name(), "Milo");
        assert_eq!(fetched.owner_id(), h.u1.id);
    }

    #[test]
    fn create_requires_a_valid_credential() {
        let h = harness();
        assert_eq!(
            h.service.create_entry("bogus", milo_draft()).unwrap_err(),
            ServiceError::Unauthenticated
        );
    }

    #[test]
    fn create_rejects_invalid_fields() {
        let h = harness();
        let mut draft = milo_draft();
        draft.weight = 0.0;
        assert!(matches!(
            h.service.create_entry(T_U1, draft).unwrap_err(),
            ServiceError::Validation(_)
        ));
    }

    // Scenario B: non-owner update on the non-admin path is Forbidden.
    #[test]
    fn non_owner_update_is_forbidden() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();

        let patch = EntryPatch {
            name: Some("Stolen".to_string()),
            ..Default::default()
        };
        assert_eq!(
            h.service
                .update_entry(Some(T_U2), entry.id(), patch, false)
                .unwrap_err(),
            ServiceError::Forbidden
        );
        // The denied update never touched the store.
        assert_eq!(h.service.get_entry(entry.id()).unwrap().name(), "Milo");
    }

    // Scenario C: admin delete succeeds regardless of ownership.
    #[test]
    fn admin_deletes_someone_elses_entry() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();

        let removed = h
            .service
            .delete_entry(Some(T_ADMIN), entry.id(), true)
            .unwrap();
        assert_eq!(removed.id(), entry.id());
        assert_eq!(
            h.service.get_entry(entry.id()).unwrap_err(),
            ServiceError::NotFound
        );
    }

    // Scenario D: region queries, including the reversed-corner call.
    #[test]
    fn region_query_finds_contained_entries_only() {
        let h = harness();
        h.service.create_entry(T_U1, milo_draft()).unwrap();

        let hits = h
            .service
            .query_region(point(59.0, 24.0), point(61.0, 25.0))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "Milo");

        // Same region, corners supplied in the opposite order.
        let reversed = h
            .service
            .query_region(point(61.0, 25.0), point(59.0, 24.0))
            .unwrap();
        assert_eq!(reversed.len(), 1);

        let empty = h
            .service
            .query_region(point(0.0, 0.0), point(1.0, 1.0))
            .unwrap();
        assert!(empty.is_empty());
    }

    // Scenario E + non-leakage: a missing id is NotFound for every caller,
    // including unauthenticated callers attempting the admin path.
    #[test]
    fn mutations_on_missing_ids_are_not_found_for_every_caller() {
        let h = harness();
        let missing = EntryId::new();
        let patch = EntryPatch::default();

        for credential in [None, Some("bogus"), Some(T_U1), Some(T_ADMIN)] {
            for as_admin in [false, true] {
                assert_eq!(
                    h.service
                        .update_entry(credential, missing, patch.clone(), as_admin)
                        .unwrap_err(),
                    ServiceError::NotFound
                );
                assert_eq!(
                    h.service
                        .delete_entry(credential, missing, as_admin)
                        .unwrap_err(),
                    ServiceError::NotFound
                );
            }
        }
    }

    #[test]
    fn anonymous_mutation_of_an_existing_entry_is_unauthenticated() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();

        assert_eq!(
            h.service
                .update_entry(None, entry.id(), EntryPatch::default(), false)
                .unwrap_err(),
            ServiceError::Unauthenticated
        );
        // An invalid credential behaves exactly like an absent one.
        assert_eq!(
            h.service
                .delete_entry(Some("bogus"), entry.id(), true)
                .unwrap_err(),
            ServiceError::Unauthenticated
        );
    }

    #[test]
    fn owner_updates_own_entry_and_snapshot_is_reembedded() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();

        let patch = EntryPatch {
            weight: Some(5.1),
            image_ref: Some(Some("blob-123".to_string())),
            ..Default::default()
        };
        let updated = h
            .service
            .update_entry(Some(T_U1), entry.id(), patch, false)
            .unwrap();
        assert_eq!(updated.weight(), 5.1);
        assert_eq!(updated.image_ref(), Some("blob-123"));
        assert_eq!(updated.owner_id(), h.u1.id);
        assert_eq!(updated.owner().display_name, "Uma User");
    }

    #[test]
    fn standard_caller_on_the_admin_path_is_forbidden() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();

        // Even the owner cannot take the admin path without the role.
        assert_eq!(
            h.service
                .update_entry(Some(T_U1), entry.id(), EntryPatch::default(), true)
                .unwrap_err(),
            ServiceError::Forbidden
        );
        assert_eq!(
            h.service
                .reassign_owner(Some(T_U2), entry.id(), h.u2.id)
                .unwrap_err(),
            ServiceError::Forbidden
        );
    }

    #[test]
    fn admin_reassigns_ownership_with_a_fresh_snapshot() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();
        // U2 becomes known to the directory through its own create.
        h.service.create_entry(T_U2, milo_draft()).unwrap();

        let updated = h
            .service
            .reassign_owner(Some(T_ADMIN), entry.id(), h.u2.id)
            .unwrap();
        assert_eq!(updated.owner_id(), h.u2.id);
        assert_eq!(updated.owner().display_name, "Ville User");

        // The old owner lost the entry; the new owner can mutate it.
        assert_eq!(
            h.service
                .update_entry(Some(T_U1), entry.id(), EntryPatch::default(), false)
                .unwrap_err(),
            ServiceError::Forbidden
        );
        assert!(
            h.service
                .update_entry(Some(T_U2), entry.id(), EntryPatch::default(), false)
                .is_ok()
        );
    }

    #[test]
    fn reassigning_to_an_unknown_identity_is_a_validation_error() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();
        assert!(matches!(
            h.service
                .reassign_owner(Some(T_ADMIN), entry.id(), IdentityId::new())
                .unwrap_err(),
            ServiceError::Validation(_)
        ));
    }

    #[test]
    fn owner_deletes_own_entry() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();
        h.service.delete_entry(Some(T_U1), entry.id(), false).unwrap();
        assert_eq!(
            h.service.get_entry(entry.id()).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn non_owner_delete_is_forbidden() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();
        assert_eq!(
            h.service
                .delete_entry(Some(T_U2), entry.id(), false)
                .unwrap_err(),
            ServiceError::Forbidden
        );
        assert!(h.service.get_entry(entry.id()).is_ok());
    }

    /// Store wrapper that hands the entry to a different owner right after
    /// serving a read, reproducing a reassignment that lands between the
    /// service's existence check and its delete.
    struct ReassignAfterRead {
        inner: InMemoryEntryStore,
        new_owner: OwnerSnapshot,
    }

    impl EntryRepository for ReassignAfterRead {
        fn create(&self, entry: Entry) -> Result<EntryId, StoreError> {
            self.inner.create(entry)
        }

        fn get(&self, id: EntryId) -> Result<Entry, StoreError> {
            let stale = self.inner.get(id)?;
            let _ = self.inner.mutate(id, &mut |e| {
                e.reassign_owner(self.new_owner.clone());
                Ok(())
            });
            Ok(stale)
        }

        fn list_all(&self) -> Result<Vec<Entry>, StoreError> {
            self.inner.list_all()
        }

        fn list_by_owner(&self, owner: IdentityId) -> Result<Vec<Entry>, StoreError> {
            self.inner.list_by_owner(owner)
        }

        fn mutate(
            &self,
            id: EntryId,
            mutation: &mut dyn FnMut(&mut Entry) -> waymark_core::DomainResult<()>,
        ) -> Result<Entry, StoreError> {
            self.inner.mutate(id, mutation)
        }

        fn delete(
            &self,
            id: EntryId,
            check: &mut dyn FnMut(&Entry) -> bool,
        ) -> Result<Entry, StoreError> {
            self.inner.delete(id, check)
        }
    }

    impl RegionQuery for ReassignAfterRead {
        fn query(&self, region: Region) -> Result<Vec<Entry>, StoreError> {
            self.inner.query(region)
        }
    }

    #[test]
    fn delete_by_an_owner_reassigned_away_mid_request_is_forbidden() {
        let u1 = identity("Uma User", "uma@example.com", Role::Standard);
        let u2 = identity("Ville User", "ville@example.com", Role::Standard);

        let store = Arc::new(ReassignAfterRead {
            inner: InMemoryEntryStore::new(),
            new_owner: OwnerSnapshot {
                id: u2.id,
                display_name: u2.display_name.clone(),
                email: u2.email.clone(),
            },
        });
        let mut tokens = HashMap::new();
        tokens.insert(T_U1.to_string(), u1.clone());
        let service = EntryService::new(
            Arc::clone(&store),
            Arc::new(InMemoryOwnerDirectory::new()),
            Arc::new(StaticVerifier { tokens }),
        );

        let entry = Entry::create(
            EntryId::new(),
            milo_draft(),
            OwnerSnapshot {
                id: u1.id,
                display_name: u1.display_name.clone(),
                email: u1.email.clone(),
            },
        )
        .unwrap();
        let id = store.create(entry).unwrap();

        // U1 owned the entry when the request resolved it, but not anymore
        // by the time the removal runs.
        assert_eq!(
            service.delete_entry(Some(T_U1), id, false).unwrap_err(),
            ServiceError::Forbidden
        );
        assert!(store.inner.get(id).is_ok());
    }

    // Consistency: mutations are reflected by an immediate region query.
    #[test]
    fn region_query_reflects_every_mutation_immediately() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();

        let home = (point(59.0, 24.0), point(61.0, 25.0));
        let away = (point(9.0, 9.0), point(11.0, 11.0));
        assert_eq!(h.service.query_region(home.0, home.1).unwrap().len(), 1);

        let patch = EntryPatch {
            location: Some(point(10.0, 10.0)),
            ..Default::default()
        };
        h.service
            .update_entry(Some(T_U1), entry.id(), patch, false)
            .unwrap();
        assert!(h.service.query_region(home.0, home.1).unwrap().is_empty());
        assert_eq!(h.service.query_region(away.0, away.1).unwrap().len(), 1);

        h.service.delete_entry(Some(T_U1), entry.id(), false).unwrap();
        assert!(h.service.query_region(away.0, away.1).unwrap().is_empty());
    }

    #[test]
    fn listings_exclude_entries_with_unresolvable_owners() {
        let h = harness();
        let kept = h.service.create_entry(T_U1, milo_draft()).unwrap();
        let orphaned = h.service.create_entry(T_U2, milo_draft()).unwrap();

        // Simulate the account store losing U2.
        h.directory.remove(h.u2.id).unwrap();

        let listed = h.service.list_entries().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), kept.id());

        assert_eq!(
            h.service.get_entry(orphaned.id()).unwrap_err(),
            ServiceError::NotFound
        );

        let hits = h
            .service
            .query_region(point(59.0, 24.0), point(61.0, 25.0))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), kept.id());
    }

    #[test]
    fn reads_resolve_current_owner_display_fields() {
        let h = harness();
        let entry = h.service.create_entry(T_U1, milo_draft()).unwrap();

        // The account store renames U1 after the snapshot was taken.
        h.directory
            .register(OwnerRecord {
                id: h.u1.id,
                display_name: "Uma Renamed".to_string(),
                email: h.u1.email.clone(),
            })
            .unwrap();

        let fetched = h.service.get_entry(entry.id()).unwrap();
        assert_eq!(fetched.owner().display_name, "Uma Renamed");
    }

    #[test]
    fn duplicate_email_conflict_from_the_directory_propagates() {
        let h = harness();
        h.service.create_entry(T_U1, milo_draft()).unwrap();

        let mut tokens = HashMap::new();
        let squatter = Identity {
            id: IdentityId::new(),
            display_name: "Squatter".to_string(),
            email: h.u1.email.clone(),
            role: Role::Standard,
        };
        tokens.insert("token-squatter".to_string(), squatter);
        let service = EntryService::new(
            Arc::new(InMemoryEntryStore::new()),
            Arc::clone(&h.directory),
            Arc::new(StaticVerifier { tokens }),
        );

        assert!(matches!(
            service.create_entry("token-squatter", milo_draft()).unwrap_err(),
            ServiceError::Conflict(_)
        ));
    }

    #[test]
    fn list_by_owner_returns_only_the_callers_entries() {
        let h = harness();
        h.service.create_entry(T_U1, milo_draft()).unwrap();
        h.service.create_entry(T_U1, milo_draft()).unwrap();
        h.service.create_entry(T_U2, milo_draft()).unwrap();

        let mine = h.service.list_entries_by_owner(T_U1).unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.owner_id() == h.u1.id));

        assert_eq!(
            h.service.list_entries_by_owner("bogus").unwrap_err(),
            ServiceError::Unauthenticated
        );
    }

    #[test]
    fn authenticate_returns_the_identity_or_unauthenticated() {
        let h = harness();
        assert_eq!(h.service.authenticate(T_ADMIN).unwrap(), h.admin);
        assert_eq!(
            h.service.authenticate("bogus").unwrap_err(),
            ServiceError::Unauthenticated
        );
    }
}
