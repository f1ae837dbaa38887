//! Share code resolution and membership.

use std::sync::Arc;

use casal_shared::config::AccessConfig;
use casal_shared::types::{CoupleId, UserId};
use casal_shared::{AppConfig, AppError};
use tracing::{debug, info, warn};

use super::boundary::{CallPolicy, call};
use super::membership::MembershipIndex;
use super::share_code::{ShareCode, ShareCodeRules};
use crate::remote::{Membership, MembershipReceipt, NewWorkspace, RemoteStore};

/// Resolves share codes and answers membership questions.
///
/// Holds the only handle to the remote store used for access decisions. The
/// membership index it keeps is what [`Self::has_access`] consults, so that
/// check never waits on the network.
pub struct AccessResolver {
    remote: Arc<dyn RemoteStore>,
    policy: CallPolicy,
    rules: ShareCodeRules,
    capacity: usize,
    index: MembershipIndex,
}

impl AccessResolver {
    /// Creates a resolver using the `access` and `remote` config sections.
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStore>, config: &AppConfig) -> Self {
        Self::with_policy(remote, &config.access, CallPolicy::from(&config.remote))
    }

    /// Creates a resolver with an explicit call policy.
    #[must_use]
    pub fn with_policy(
        remote: Arc<dyn RemoteStore>,
        access: &AccessConfig,
        policy: CallPolicy,
    ) -> Self {
        Self {
            remote,
            policy,
            rules: ShareCodeRules::from(access),
            capacity: access.member_capacity,
            index: MembershipIndex::new(),
        }
    }

    /// The remote store handle.
    #[must_use]
    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    /// The call policy applied to every remote call.
    #[must_use]
    pub const fn policy(&self) -> &CallPolicy {
        &self.policy
    }

    /// Maximum members per workspace.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resolves a share code to the workspace it points to.
    ///
    /// Malformed codes are rejected without a remote call.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the code is malformed, unknown or expired
    /// - `Unavailable` if the store cannot be reached
    pub async fn resolve(&self, raw: &str) -> Result<CoupleId, AppError> {
        let code = ShareCode::parse(raw, &self.rules).map_err(|err| {
            debug!(error = %err, "malformed share code");
            AppError::NotFound(format!("invalid share code: {err}"))
        })?;

        let found = call(&self.policy, "lookup_workspace_by_share_code", || {
            self.remote.lookup_workspace_by_share_code(&code)
        })
        .await?;

        found.ok_or_else(|| AppError::NotFound(format!("no workspace for share code {code}")))
    }

    /// True iff `user_id` is a known member of `couple_id`.
    #[must_use]
    pub fn has_access(&self, user_id: UserId, couple_id: CoupleId) -> bool {
        self.index.contains(user_id, couple_id)
    }

    /// The known membership of `user_id` in `couple_id`.
    #[must_use]
    pub fn membership(&self, user_id: UserId, couple_id: CoupleId) -> Option<Membership> {
        self.index.get(user_id, couple_id)
    }

    /// Fetches and indexes every membership of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store cannot be reached.
    pub async fn load_memberships(&self, user_id: UserId) -> Result<Vec<Membership>, AppError> {
        let memberships = call(&self.policy, "memberships_for", || {
            self.remote.memberships_for(user_id)
        })
        .await?;

        self.index.replace(user_id, &memberships);
        debug!(%user_id, count = memberships.len(), "memberships loaded");
        Ok(memberships)
    }

    /// Records a membership learned from elsewhere, e.g. a change event.
    pub fn record_membership(&self, membership: Membership) {
        self.index.record(membership);
    }

    /// Drops every indexed membership of `user_id`.
    pub fn forget(&self, user_id: UserId) {
        self.index.forget(user_id);
    }

    /// Makes `user_id` a member of `couple_id`.
    ///
    /// Joining a workspace the user already belongs to returns the existing
    /// membership without creating anything. The early capacity check only
    /// saves a write; the store enforces the cap again under its own lock.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the workspace is at capacity or the store refuses
    /// - `Unavailable` if the store cannot be reached
    pub async fn join(
        &self,
        user_id: UserId,
        couple_id: CoupleId,
    ) -> Result<MembershipReceipt, AppError> {
        let members = call(&self.policy, "fetch_members", || {
            self.remote.fetch_members(couple_id)
        })
        .await?;

        if let Some(existing) = members.iter().find(|m| m.user_id == user_id) {
            self.index.record(*existing);
            debug!(%user_id, %couple_id, "already a member");
            return Ok(MembershipReceipt {
                membership: *existing,
                created: false,
            });
        }

        if members.len() >= self.capacity {
            warn!(%couple_id, members = members.len(), "workspace at capacity");
            return Err(AppError::Conflict(format!(
                "workspace already has {} members",
                self.capacity
            )));
        }

        let receipt = call(&self.policy, "create_or_confirm_membership", || {
            self.remote
                .create_or_confirm_membership(user_id, couple_id, self.capacity)
        })
        .await?;

        self.index.record(receipt.membership);
        info!(%user_id, %couple_id, created = receipt.created, "membership established");
        Ok(receipt)
    }

    /// Creates a workspace owned by `owner`.
    ///
    /// Not retried: a lost response must not leave a second workspace behind.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store cannot be reached.
    pub async fn create_workspace(&self, owner: UserId) -> Result<NewWorkspace, AppError> {
        let created = call(&self.policy.single_attempt(), "create_workspace", || {
            self.remote.create_workspace(owner)
        })
        .await?;

        self.index.record(created.membership);
        info!(
            user_id = %owner,
            couple_id = %created.membership.couple_id,
            "workspace created"
        );
        Ok(created)
    }
}
