//! The workspace state store.

use std::collections::VecDeque;
use std::sync::Arc;

use casal_shared::AppError;
use casal_shared::types::{CoupleId, ProfileId, Revision};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, warn};

use super::mutation::{Mutation, MutationOp};
use super::state::WorkspaceState;
use crate::access::AccessResolver;
use crate::entity::{Entity, EntityKey, Profile};
use crate::remote::{Change, ChangeEvent, Revisioned};
use crate::session::Session;
use crate::validation::{
    ValidationContext, ValidationPolicy, ValidationReport, validate, validate_removal,
};

/// Source of "today" for date bounds.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// How a remote change event was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The change is now reflected in local state.
    Applied,
    /// A write at the same or a higher revision was already seen.
    Stale,
    /// The actor is not a member of the workspace, or the event targets another one.
    Forbidden,
    /// The entity failed validation; one message per violated rule.
    Rejected(Vec<String>),
}

/// Counts from one [`WorkspaceStore::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    /// Events applied.
    pub applied: usize,
    /// Events ignored as stale.
    pub stale: usize,
    /// Events from non-members.
    pub forbidden: usize,
    /// Events failing validation.
    pub rejected: usize,
    /// The channel closed; the workspace must be reopened to keep receiving.
    pub disconnected: bool,
}

impl DrainSummary {
    /// Total events taken off the channel.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.applied + self.stale + self.forbidden + self.rejected
    }

    fn count(&mut self, outcome: &MergeOutcome) {
        match outcome {
            MergeOutcome::Applied => self.applied += 1,
            MergeOutcome::Stale => self.stale += 1,
            MergeOutcome::Forbidden => self.forbidden += 1,
            MergeOutcome::Rejected(_) => self.rejected += 1,
        }
    }
}

/// Counts from loading a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Entities loaded.
    pub loaded: usize,
    /// Entities skipped because they failed validation.
    pub rejected: usize,
}

/// Authoritative local copy of one workspace.
///
/// Every local mutation goes through [`Self::apply`]; every remote change
/// goes through [`Self::merge_remote`]. Both validate before touching state.
/// Accepted local mutations wait in the outbox until pushed.
pub struct WorkspaceStore {
    state: WorkspaceState,
    access: Arc<AccessResolver>,
    policy: ValidationPolicy,
    clock: Clock,
    outbox: VecDeque<Mutation>,
    inbox: Option<mpsc::Receiver<ChangeEvent>>,
    drain_limit: usize,
}

impl WorkspaceStore {
    /// Empty store for `couple_id`.
    #[must_use]
    pub fn new(couple_id: CoupleId, access: Arc<AccessResolver>, policy: ValidationPolicy) -> Self {
        Self {
            state: WorkspaceState::new(couple_id),
            access,
            policy,
            clock: Arc::new(|| Utc::now().date_naive()),
            outbox: VecDeque::new(),
            inbox: None,
            drain_limit: usize::MAX,
        }
    }

    /// Replaces the clock used for date bounds.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Caps how many events one drain merges.
    #[must_use]
    pub fn with_drain_limit(mut self, limit: usize) -> Self {
        self.drain_limit = limit.max(1);
        self
    }

    /// Workspace this store holds.
    #[must_use]
    pub const fn couple_id(&self) -> CoupleId {
        self.state.couple_id()
    }

    /// Read access to the entities.
    #[must_use]
    pub const fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Applies a local mutation on behalf of `session`.
    ///
    /// Returns the upserted entity, or the removed one.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the mutation targets another workspace, or the
    ///   session is not bound to this one as a member
    /// - `NotFound` when removing an unknown entity
    /// - `Invalid` with every violated rule; state is unchanged
    pub fn apply(&mut self, session: &Session, mutation: Mutation) -> Result<Entity, AppError> {
        let couple_id = self.couple_id();
        if mutation.couple_id != couple_id {
            return Err(AppError::Forbidden(format!(
                "mutation targets workspace {} but this store holds {couple_id}",
                mutation.couple_id
            )));
        }
        if !session.may_act_on(couple_id) {
            return Err(AppError::Forbidden(format!(
                "session may not act on workspace {couple_id}"
            )));
        }

        let accepted = match &mutation.op {
            MutationOp::Upsert(entity) => {
                self.check(entity).into_result()?;
                self.state.upsert_local(entity.clone());
                entity.clone()
            }
            MutationOp::Remove(key) => {
                if self.state.get(*key).is_none() {
                    return Err(AppError::NotFound(format!("{key}")));
                }
                validate_removal(*key, &self.state).into_result()?;
                self.state
                    .remove_local(*key)
                    .ok_or_else(|| AppError::NotFound(format!("{key}")))?
            }
        };

        debug!(key = %mutation.key(), queued = self.outbox.len() + 1, "local mutation applied");
        self.outbox.push_back(mutation);
        Ok(accepted)
    }

    /// Merges a change event pushed by the remote store.
    pub fn merge_remote(&mut self, event: ChangeEvent) -> MergeOutcome {
        let couple_id = self.couple_id();
        if event.couple_id != couple_id {
            warn!(%couple_id, foreign = %event.couple_id, "event for another workspace");
            return MergeOutcome::Forbidden;
        }

        // A joiner is not yet indexed when its own join event arrives.
        if let Change::MemberJoined(membership) = &event.change {
            if membership.couple_id != couple_id || membership.user_id != event.actor {
                warn!(actor = %event.actor, "member event for someone else");
                return MergeOutcome::Forbidden;
            }
            self.access.record_membership(*membership);
            debug!(user_id = %membership.user_id, "member joined");
            return MergeOutcome::Applied;
        }

        if !self.access.has_access(event.actor, couple_id) {
            warn!(actor = %event.actor, revision = %event.revision, "event from non-member");
            return MergeOutcome::Forbidden;
        }

        let outcome = match event.change {
            Change::Upsert(entity) => self.merge_upsert(entity, event.revision),
            Change::Remove(key) => self.merge_remove(key, event.revision),
            Change::MemberJoined(_) => MergeOutcome::Applied,
        };

        if let MergeOutcome::Rejected(errors) = &outcome {
            warn!(revision = %event.revision, ?errors, "remote change rejected");
        }
        outcome
    }

    /// Loads a fetched snapshot, referenced kinds first.
    pub fn load_snapshot(&mut self, mut snapshot: Vec<Revisioned>) -> LoadSummary {
        snapshot.sort_by_key(|item| (item.entity.kind().load_rank(), item.entity.key()));

        let mut summary = LoadSummary::default();
        for Revisioned { entity, revision } in snapshot {
            match self.merge_upsert(entity, revision) {
                MergeOutcome::Applied => summary.loaded += 1,
                MergeOutcome::Rejected(errors) => {
                    warn!(%revision, ?errors, "snapshot entity rejected");
                    summary.rejected += 1;
                }
                MergeOutcome::Stale | MergeOutcome::Forbidden => {}
            }
        }
        debug!(loaded = summary.loaded, rejected = summary.rejected, "snapshot loaded");
        summary
    }

    /// Attaches the change-event channel drained by [`Self::drain`].
    pub fn attach_inbox(&mut self, inbox: mpsc::Receiver<ChangeEvent>) {
        self.inbox = Some(inbox);
    }

    /// True while a change-event channel is attached and open.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        self.inbox.is_some()
    }

    /// Merges every event already waiting on the channel, up to the drain limit.
    pub fn drain(&mut self) -> DrainSummary {
        let mut summary = DrainSummary::default();
        let Some(mut inbox) = self.inbox.take() else {
            return summary;
        };

        while summary.total() < self.drain_limit {
            match inbox.try_recv() {
                Ok(event) => {
                    let outcome = self.merge_remote(event);
                    summary.count(&outcome);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    summary.disconnected = true;
                    break;
                }
            }
        }

        if summary.disconnected {
            warn!(couple_id = %self.couple_id(), "change feed closed");
        } else {
            self.inbox = Some(inbox);
        }
        summary
    }

    /// Mutations accepted locally and not yet confirmed by the store, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Mutation> {
        self.outbox.iter()
    }

    /// Oldest unconfirmed mutation.
    #[must_use]
    pub fn next_pending(&self) -> Option<&Mutation> {
        self.outbox.front()
    }

    /// Marks the oldest pending mutation as stored at `revision`.
    pub fn acknowledge(&mut self, revision: Revision) -> Option<Mutation> {
        let mutation = self.outbox.pop_front()?;
        self.state.confirm(mutation.key(), revision);
        Some(mutation)
    }

    /// Profiles still carrying a placeholder name.
    #[must_use]
    pub fn unconfigured_profiles(&self) -> Vec<&Profile> {
        self.state.unconfigured_profiles()
    }

    /// True once every profile has been named.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.state.is_configured()
    }

    /// What `debtor` still owes `creditor`.
    #[must_use]
    pub fn outstanding_balance(&self, debtor: ProfileId, creditor: ProfileId) -> Decimal {
        self.state.outstanding_balance(debtor, creditor)
    }

    /// Revision of the last confirmed write to `key`.
    #[must_use]
    pub fn revision_of(&self, key: EntityKey) -> Option<Revision> {
        self.state.revision_of(key)
    }

    fn check(&self, entity: &Entity) -> ValidationReport {
        let ctx = ValidationContext {
            couple_id: self.couple_id(),
            lookup: &self.state,
            today: (self.clock)(),
            policy: &self.policy,
        };
        validate(entity, &ctx)
    }

    fn merge_upsert(&mut self, entity: Entity, revision: Revision) -> MergeOutcome {
        let key = entity.key();
        if !self.state.is_newer(key, revision) {
            debug!(%key, %revision, "stale upsert ignored");
            return MergeOutcome::Stale;
        }

        let report = self.check(&entity);
        if !report.is_valid() {
            return MergeOutcome::Rejected(report.errors());
        }

        self.state.upsert_remote(entity, revision);
        debug!(%key, %revision, "remote upsert merged");
        MergeOutcome::Applied
    }

    fn merge_remove(&mut self, key: EntityKey, revision: Revision) -> MergeOutcome {
        if !self.state.is_newer(key, revision) {
            debug!(%key, %revision, "stale removal ignored");
            return MergeOutcome::Stale;
        }

        if self.state.get(key).is_some() {
            let report = validate_removal(key, &self.state);
            if !report.is_valid() {
                return MergeOutcome::Rejected(report.errors());
            }
        }

        self.state.remove_remote(key, revision);
        debug!(%key, %revision, "remote removal merged");
        MergeOutcome::Applied
    }
}
