//! Opening workspaces and pushing local writes.

use std::sync::Arc;

use casal_shared::config::SyncConfig;
use casal_shared::types::CoupleId;
use casal_shared::{AppConfig, AppError};
use tracing::{info, warn};

use super::store::{Clock, WorkspaceStore};
use crate::access::AccessResolver;
use crate::access::boundary::call;
use crate::session::Session;
use crate::validation::ValidationPolicy;

/// Moves data between a [`WorkspaceStore`] and the remote store.
pub struct WorkspaceSync {
    access: Arc<AccessResolver>,
    policy: ValidationPolicy,
    config: SyncConfig,
    clock: Option<Clock>,
}

impl WorkspaceSync {
    /// Creates a syncer using the `validation` and `sync` config sections.
    #[must_use]
    pub fn new(access: Arc<AccessResolver>, config: &AppConfig) -> Self {
        Self {
            access,
            policy: ValidationPolicy::from(&config.validation),
            config: config.sync.clone(),
            clock: None,
        }
    }

    /// Uses `clock` for date bounds in every store this syncer opens.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Opens `couple_id`: subscribes to its changes, indexes its members,
    /// then loads its snapshot.
    ///
    /// Subscribing first means no write made while the snapshot is in flight
    /// is missed; events already covered by the snapshot merge as stale.
    /// Indexing members lets events from a partner who joined earlier pass
    /// the access check.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the session is bound to `couple_id` as a member
    /// - `Unavailable` if the store cannot be reached
    pub async fn open(
        &self,
        session: &Session,
        couple_id: CoupleId,
    ) -> Result<WorkspaceStore, AppError> {
        if !session.may_act_on(couple_id) {
            return Err(AppError::Forbidden(format!(
                "session may not open workspace {couple_id}"
            )));
        }

        let remote = self.access.remote();
        let policy = self.access.policy().single_attempt();
        let inbox = call(&policy, "subscribe", || remote.subscribe(couple_id)).await?;
        let members = call(&policy, "fetch_members", || remote.fetch_members(couple_id)).await?;
        for membership in members {
            self.access.record_membership(membership);
        }
        let snapshot = call(&policy, "fetch_workspace_entities", || {
            remote.fetch_workspace_entities(couple_id)
        })
        .await?;

        let mut store =
            WorkspaceStore::new(couple_id, Arc::clone(&self.access), self.policy.clone())
                .with_drain_limit(self.config.drain_batch_limit);
        if let Some(clock) = &self.clock {
            store = store.with_clock(Arc::clone(clock));
        }

        let summary = store.load_snapshot(snapshot);
        store.attach_inbox(inbox);
        info!(
            %couple_id,
            loaded = summary.loaded,
            rejected = summary.rejected,
            "workspace opened"
        );
        Ok(store)
    }

    /// Pushes pending mutations in order, returning how many were stored.
    ///
    /// Each push is attempted once: a write that landed but timed out must
    /// not be stored again under a newer revision. Stops at the first
    /// failure; that mutation and everything after it stay queued for the
    /// next flush.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when signed out
    /// - the first push failure, converted from the remote error
    pub async fn flush(
        &self,
        session: &Session,
        store: &mut WorkspaceStore,
    ) -> Result<usize, AppError> {
        let actor = session
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("sign in first".into()))?;
        let remote = self.access.remote();
        let policy = self.access.policy();

        let mut pushed = 0;
        while let Some(mutation) = store.next_pending().cloned() {
            let key = mutation.key();
            let pushed_at = call(&policy, "push", || remote.push(actor, mutation.clone())).await;
            let revision = match pushed_at {
                Ok(revision) => revision,
                Err(err) => {
                    warn!(%key, pushed, error = %err, "push failed, keeping the rest queued");
                    return Err(err.into());
                }
            };
            store.acknowledge(revision);
            pushed += 1;
        }

        if pushed > 0 {
            info!(couple_id = %store.couple_id(), pushed, "outbox flushed");
        }
        Ok(pushed)
    }
}
