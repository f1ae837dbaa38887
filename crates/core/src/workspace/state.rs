//! In-memory entity state of one workspace.

use std::collections::{BTreeMap, HashMap};

use casal_shared::types::{CardId, CoupleId, ExpenseId, ProfileId, Revision, TagId};
use rust_decimal::Decimal;

use crate::entity::{
    Agreement, Card, Entity, EntityKey, EntityKind, Expense, Profile, ProfileStatus, Settlement,
    Tag,
};
use crate::validation::EntityLookup;
use crate::validation::balance;

/// An entity with its write history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Current content.
    pub entity: Entity,
    /// Revision of the last confirmed remote write; `None` if never confirmed.
    pub revision: Option<Revision>,
    /// True while the content is a local write not yet confirmed by the store.
    pub pending: bool,
}

/// Entities of one workspace keyed by kind and id.
///
/// Keys are ordered, so listings come out grouped by kind and, within a
/// kind, in creation order of the time-ordered ids.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
    couple_id: CoupleId,
    records: BTreeMap<EntityKey, Record>,
    tombstones: HashMap<EntityKey, Revision>,
}

impl WorkspaceState {
    /// Empty state for `couple_id`.
    #[must_use]
    pub fn new(couple_id: CoupleId) -> Self {
        Self {
            couple_id,
            records: BTreeMap::new(),
            tombstones: HashMap::new(),
        }
    }

    /// Workspace this state belongs to.
    #[must_use]
    pub const fn couple_id(&self) -> CoupleId {
        self.couple_id
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The entity stored under `key`.
    #[must_use]
    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.records.get(&key).map(|record| &record.entity)
    }

    /// The record stored under `key`.
    #[must_use]
    pub fn record(&self, key: EntityKey) -> Option<&Record> {
        self.records.get(&key)
    }

    /// All live entities.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.records.values().map(|record| &record.entity)
    }

    /// Highest revision seen for `key`, live or removed.
    #[must_use]
    pub fn revision_of(&self, key: EntityKey) -> Option<Revision> {
        let live = self.records.get(&key).and_then(|record| record.revision);
        let removed = self.tombstones.get(&key).copied();
        live.max(removed)
    }

    /// True if a remote write at `revision` supersedes what is known for `key`.
    #[must_use]
    pub fn is_newer(&self, key: EntityKey, revision: Revision) -> bool {
        self.revision_of(key).is_none_or(|known| revision > known)
    }

    /// Profiles still carrying a placeholder name.
    #[must_use]
    pub fn unconfigured_profiles(&self) -> Vec<&Profile> {
        self.profiles()
            .into_iter()
            .filter(|profile| profile.status() == ProfileStatus::Unconfigured)
            .collect()
    }

    /// True once the workspace has profiles and every one of them is named.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        let profiles = self.profiles();
        !profiles.is_empty()
            && profiles
                .iter()
                .all(|profile| profile.status() == ProfileStatus::Configured)
    }

    /// What `debtor` still owes `creditor`.
    #[must_use]
    pub fn outstanding_balance(&self, debtor: ProfileId, creditor: ProfileId) -> Decimal {
        balance::outstanding(self, debtor, creditor, None)
    }

    pub(crate) fn upsert_local(&mut self, entity: Entity) {
        let key = entity.key();
        let revision = self.records.get(&key).and_then(|record| record.revision);
        self.records.insert(
            key,
            Record {
                entity,
                revision,
                pending: true,
            },
        );
    }

    pub(crate) fn remove_local(&mut self, key: EntityKey) -> Option<Entity> {
        let record = self.records.remove(&key)?;
        if let Some(revision) = record.revision {
            self.bury(key, revision);
        }
        Some(record.entity)
    }

    pub(crate) fn upsert_remote(&mut self, entity: Entity, revision: Revision) {
        let key = entity.key();
        self.tombstones.remove(&key);
        self.records.insert(
            key,
            Record {
                entity,
                revision: Some(revision),
                pending: false,
            },
        );
    }

    pub(crate) fn remove_remote(&mut self, key: EntityKey, revision: Revision) {
        self.records.remove(&key);
        self.bury(key, revision);
    }

    /// Records the revision the store assigned to a pushed local write.
    ///
    /// Content is never touched: if a remote write replaced the local one in
    /// the meantime, the store's own event for this revision reconciles it.
    pub(crate) fn confirm(&mut self, key: EntityKey, revision: Revision) {
        match self.records.get_mut(&key) {
            Some(record) if record.pending => {
                record.revision = record.revision.max(Some(revision));
                record.pending = false;
            }
            Some(_) => {}
            None => self.bury(key, revision),
        }
    }

    fn bury(&mut self, key: EntityKey, revision: Revision) {
        let tombstone = self.tombstones.entry(key).or_insert(revision);
        *tombstone = (*tombstone).max(revision);
    }

    fn find(&self, kind: EntityKind, id: uuid::Uuid) -> Option<&Entity> {
        self.get(EntityKey::new(kind, id))
    }
}

macro_rules! typed {
    ($records:expr, $variant:ident) => {
        $records
            .values()
            .filter_map(|record| match &record.entity {
                Entity::$variant(inner) => Some(inner),
                _ => None,
            })
            .collect()
    };
}

impl EntityLookup for WorkspaceState {
    fn profile(&self, id: ProfileId) -> Option<&Profile> {
        match self.find(EntityKind::Profile, id.into_inner()) {
            Some(Entity::Profile(profile)) => Some(profile),
            _ => None,
        }
    }

    fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        match self.find(EntityKind::Expense, id.into_inner()) {
            Some(Entity::Expense(expense)) => Some(expense),
            _ => None,
        }
    }

    fn tag(&self, id: TagId) -> Option<&Tag> {
        match self.find(EntityKind::Tag, id.into_inner()) {
            Some(Entity::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    fn card(&self, id: CardId) -> Option<&Card> {
        match self.find(EntityKind::Card, id.into_inner()) {
            Some(Entity::Card(card)) => Some(card),
            _ => None,
        }
    }

    fn profiles(&self) -> Vec<&Profile> {
        typed!(self.records, Profile)
    }

    fn expenses(&self) -> Vec<&Expense> {
        typed!(self.records, Expense)
    }

    fn tags(&self) -> Vec<&Tag> {
        typed!(self.records, Tag)
    }

    fn cards(&self) -> Vec<&Card> {
        typed!(self.records, Card)
    }

    fn agreements(&self) -> Vec<&Agreement> {
        typed!(self.records, Agreement)
    }

    fn settlements(&self) -> Vec<&Settlement> {
        typed!(self.records, Settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::test_support::{expense, profile};
    use rust_decimal_macros::dec;

    #[test]
    fn test_lookup_by_id() {
        let couple_id = CoupleId::new();
        let ana = profile(couple_id, "Ana");
        let mut state = WorkspaceState::new(couple_id);
        state.upsert_local(Entity::from(ana.clone()));

        assert_eq!(state.profile(ana.id), Some(&ana));
        assert_eq!(state.expense(ExpenseId::from_uuid(ana.id.into_inner())), None);
        assert_eq!(state.profiles().len(), 1);
    }

    #[test]
    fn test_configuration_projection() {
        let couple_id = CoupleId::new();
        let mut state = WorkspaceState::new(couple_id);
        assert!(!state.is_configured());

        let mut first = profile(couple_id, "Pessoa 1");
        state.upsert_local(Entity::from(first.clone()));
        state.upsert_local(Entity::from(profile(couple_id, "Bia")));
        assert_eq!(state.unconfigured_profiles().len(), 1);
        assert!(!state.is_configured());

        first.name = "Ana".to_string();
        state.upsert_local(Entity::from(first));
        assert!(state.unconfigured_profiles().is_empty());
        assert!(state.is_configured());
    }

    #[test]
    fn test_tombstone_blocks_older_writes() {
        let couple_id = CoupleId::new();
        let ana = profile(couple_id, "Ana");
        let key = ana.key();
        let mut state = WorkspaceState::new(couple_id);

        state.upsert_remote(Entity::from(ana.clone()), Revision(3));
        state.remove_remote(key, Revision(5));
        assert!(state.get(key).is_none());
        assert!(!state.is_newer(key, Revision(4)));
        assert!(state.is_newer(key, Revision(6)));

        state.upsert_remote(Entity::from(ana), Revision(6));
        assert!(state.get(key).is_some());
        assert_eq!(state.revision_of(key), Some(Revision(6)));
    }

    #[test]
    fn test_confirm_only_touches_pending_records() {
        let couple_id = CoupleId::new();
        let mut ana = profile(couple_id, "Ana");
        let key = ana.key();
        let mut state = WorkspaceState::new(couple_id);

        state.upsert_local(Entity::from(ana.clone()));
        assert_eq!(state.revision_of(key), None);
        state.confirm(key, Revision(2));
        assert_eq!(state.revision_of(key), Some(Revision(2)));
        assert!(!state.record(key).unwrap().pending);

        ana.name = "Ana Maria".to_string();
        state.upsert_remote(Entity::from(ana), Revision(4));
        state.confirm(key, Revision(5));
        assert_eq!(state.revision_of(key), Some(Revision(4)));
    }

    #[test]
    fn test_confirmed_removal_leaves_tombstone() {
        let couple_id = CoupleId::new();
        let ana = profile(couple_id, "Ana");
        let key = ana.key();
        let mut state = WorkspaceState::new(couple_id);

        state.upsert_remote(Entity::from(ana), Revision(1));
        assert!(state.remove_local(key).is_some());
        state.confirm(key, Revision(7));
        assert_eq!(state.revision_of(key), Some(Revision(7)));
        assert!(!state.is_newer(key, Revision(7)));
    }

    #[test]
    fn test_outstanding_balance_projection() {
        let couple_id = CoupleId::new();
        let ana = profile(couple_id, "Ana");
        let bia = profile(couple_id, "Bia");
        let mut state = WorkspaceState::new(couple_id);
        state.upsert_local(Entity::from(ana.clone()));
        state.upsert_local(Entity::from(bia.clone()));
        state.upsert_local(Entity::from(expense(couple_id, ana.id, dec!(100))));

        assert_eq!(state.outstanding_balance(bia.id, ana.id), dec!(50));
        assert_eq!(state.outstanding_balance(ana.id, bia.id), dec!(0));
    }

    #[test]
    fn test_outstanding_balance_saturates() {
        let couple_id = CoupleId::new();
        let ana = profile(couple_id, "Ana");
        let bia = profile(couple_id, "Bia");
        let mut state = WorkspaceState::new(couple_id);
        state.upsert_local(Entity::from(ana.clone()));
        state.upsert_local(Entity::from(bia.clone()));
        for _ in 0..3 {
            state.upsert_local(Entity::from(expense(couple_id, ana.id, Decimal::MAX)));
        }

        assert_eq!(state.outstanding_balance(bia.id, ana.id), Decimal::MAX);
    }
}
