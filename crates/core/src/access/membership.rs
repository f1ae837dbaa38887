//! Already-loaded membership state.

use std::collections::HashMap;

use casal_shared::types::{CoupleId, UserId};
use dashmap::DashMap;

use crate::remote::Membership;

/// Memberships known to this client, keyed by identity.
///
/// Lookups are synchronous and never touch the network, so UI guards can
/// consult it on every render.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    by_user: DashMap<UserId, HashMap<CoupleId, Membership>>,
}

impl MembershipIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `user_id` is a recorded member of `couple_id`.
    #[must_use]
    pub fn contains(&self, user_id: UserId, couple_id: CoupleId) -> bool {
        self.by_user
            .get(&user_id)
            .is_some_and(|memberships| memberships.contains_key(&couple_id))
    }

    /// Returns the membership of `user_id` in `couple_id`, if recorded.
    #[must_use]
    pub fn get(&self, user_id: UserId, couple_id: CoupleId) -> Option<Membership> {
        self.by_user
            .get(&user_id)
            .and_then(|memberships| memberships.get(&couple_id).copied())
    }

    /// Records one membership; recording it again is a no-op.
    pub fn record(&self, membership: Membership) {
        self.by_user
            .entry(membership.user_id)
            .or_default()
            .insert(membership.couple_id, membership);
    }

    /// Replaces everything known about `user_id`.
    pub fn replace(&self, user_id: UserId, memberships: &[Membership]) {
        let map = memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| (m.couple_id, *m))
            .collect();
        self.by_user.insert(user_id, map);
    }

    /// Forgets every membership of `user_id`.
    pub fn forget(&self, user_id: UserId) {
        self.by_user.remove(&user_id);
    }
}
