//! Property-based tests for last-writer-wins merging.

use std::sync::Arc;

use casal_shared::config::AccessConfig;
use casal_shared::types::{CoupleId, ProfileId, Revision, TagId, UserId};
use proptest::prelude::*;

use super::{MergeOutcome, WorkspaceStore};
use crate::access::{AccessResolver, CallPolicy};
use crate::entity::{Entity, Tag};
use crate::remote::{Change, ChangeEvent, Membership, MockRemoteStore};
use crate::validation::ValidationPolicy;
use crate::validation::test_support::today;

fn store_with_member(couple_id: CoupleId, actor: UserId) -> WorkspaceStore {
    let access = Arc::new(AccessResolver::with_policy(
        Arc::new(MockRemoteStore::new()),
        &AccessConfig::default(),
        CallPolicy::default(),
    ));
    access.record_membership(Membership {
        user_id: actor,
        couple_id,
        profile_id: ProfileId::new(),
    });
    WorkspaceStore::new(couple_id, access, ValidationPolicy::default()).with_clock(Arc::new(today))
}

/// Distinct revisions paired with a tag name, in random delivery order.
fn writes() -> impl Strategy<Value = Vec<(u64, String)>> {
    prop::collection::btree_set(1u64..1_000, 1..12)
        .prop_map(|revisions| {
            revisions
                .into_iter()
                .map(|revision| (revision, format!("tag r{revision}")))
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* delivery order of writes to one entity, the write with the
    /// highest revision is what remains.
    #[test]
    fn prop_highest_revision_wins(writes in writes()) {
        let couple_id = CoupleId::new();
        let actor = UserId::new();
        let mut store = store_with_member(couple_id, actor);
        let id = TagId::new();

        for (revision, name) in &writes {
            let tag = Tag { id, couple_id, name: name.clone(), color: None };
            store.merge_remote(ChangeEvent {
                actor,
                couple_id,
                revision: Revision(*revision),
                change: Change::Upsert(Entity::from(tag)),
            });
        }

        let (max_revision, expected) = writes.iter().max_by_key(|(r, _)| *r).unwrap();
        let key = Tag { id, couple_id, name: String::new(), color: None }.key();
        let Some(Entity::Tag(stored)) = store.state().get(key) else {
            panic!("tag missing");
        };
        prop_assert_eq!(&stored.name, expected);
        prop_assert_eq!(store.revision_of(key), Some(Revision(*max_revision)));
    }

    /// *For any* removal, upserts at lower revisions never resurrect the entity.
    #[test]
    fn prop_tombstone_stops_resurrection(removed_at in 2u64..500, late in 1u64..500) {
        prop_assume!(late < removed_at);
        let couple_id = CoupleId::new();
        let actor = UserId::new();
        let mut store = store_with_member(couple_id, actor);
        let tag = Tag { id: TagId::new(), couple_id, name: "Casa".into(), color: None };
        let key = tag.key();

        store.merge_remote(ChangeEvent {
            actor,
            couple_id,
            revision: Revision(removed_at),
            change: Change::Remove(key),
        });
        let outcome = store.merge_remote(ChangeEvent {
            actor,
            couple_id,
            revision: Revision(late),
            change: Change::Upsert(Entity::from(tag)),
        });

        prop_assert_eq!(outcome, MergeOutcome::Stale);
        prop_assert!(store.state().get(key).is_none());
    }
}
