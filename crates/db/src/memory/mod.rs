//! In-process remote store.
//!
//! All state sits behind one lock and every write gets the next value of a
//! single store-wide revision counter, so revisions are totally ordered.
//! Subscribers receive every write to their workspace, including their own,
//! on bounded channels; a subscriber that falls behind is dropped and sees
//! its channel close.

mod codes;
mod faults;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use casal_core::access::{ShareCode, ShareCodeError, ShareCodeRules};
use casal_core::entity::{Entity, EntityKey, Profile};
use casal_core::remote::{
    Change, ChangeEvent, Membership, MembershipReceipt, NewWorkspace, RemoteError, RemoteStore,
    Revisioned,
};
use casal_core::workspace::{Mutation, MutationOp};
use casal_shared::AppConfig;
use casal_shared::types::{CoupleId, ProfileId, Revision, UserId};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use codes::CodeRegistry;
use faults::Faults;

pub use codes::GENERATED_LEN;

#[derive(Debug, Default)]
struct Workspace {
    // In join order; the position is the member's placeholder slot.
    members: Vec<Membership>,
    entities: BTreeMap<EntityKey, Revisioned>,
    subscribers: Vec<mpsc::Sender<ChangeEvent>>,
}

impl Workspace {
    fn member(&self, user_id: UserId) -> Option<&Membership> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    fn broadcast(&mut self, event: &ChangeEvent) {
        self.subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(couple_id = %event.couple_id, "subscriber fell behind, dropping it");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        });
    }
}

#[derive(Debug, Default)]
struct Inner {
    revision: Revision,
    workspaces: HashMap<CoupleId, Workspace>,
    codes: CodeRegistry,
}

impl Inner {
    fn next_revision(&mut self) -> Revision {
        self.revision = self.revision.next();
        self.revision
    }

    fn workspace(&mut self, couple_id: CoupleId) -> Result<&mut Workspace, RemoteError> {
        self.workspaces
            .get_mut(&couple_id)
            .ok_or_else(|| RemoteError::NotFound(format!("workspace {couple_id}")))
    }

    /// Adds `user_id` to `couple_id` with a placeholder profile, returning
    /// the membership and the profile as stored.
    fn add_member(
        &mut self,
        user_id: UserId,
        couple_id: CoupleId,
    ) -> Result<(Membership, Revisioned), RemoteError> {
        let revision = self.next_revision();
        let workspace = self.workspace(couple_id)?;

        let profile = Profile {
            id: ProfileId::new(),
            couple_id,
            user_id: Some(user_id),
            name: Profile::placeholder_name(workspace.members.len()).to_string(),
            color: None,
        };
        let membership = Membership {
            user_id,
            couple_id,
            profile_id: profile.id,
        };
        let stored = Revisioned {
            entity: Entity::from(profile),
            revision,
        };

        workspace.members.push(membership);
        workspace.entities.insert(stored.entity.key(), stored.clone());
        Ok((membership, stored))
    }
}

/// Remote store kept in process memory.
pub struct MemoryStore {
    inner: Mutex<Inner>,
    faults: Faults,
    channel_capacity: usize,
    member_capacity: Option<usize>,
    rules: ShareCodeRules,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl MemoryStore {
    /// Creates an empty store sized from the `sync` config section, parsing
    /// registered share codes with the `access` rules.
    ///
    /// Memberships are capped by the capacity each caller passes; see
    /// [`Self::with_member_capacity`] for a tighter store-wide cap.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            faults: Faults::default(),
            channel_capacity: config.sync.channel_capacity.max(1),
            member_capacity: None,
            rules: ShareCodeRules::from(&config.access),
        }
    }

    /// Makes the store refuse memberships beyond `capacity`, whatever the
    /// caller asks for.
    #[must_use]
    pub const fn with_member_capacity(mut self, capacity: usize) -> Self {
        self.member_capacity = Some(capacity);
        self
    }

    /// Registers `raw` as a share code for `couple_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` breaks the configured share code rules.
    pub fn register_share_code(
        &self,
        couple_id: CoupleId,
        raw: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShareCode, ShareCodeError> {
        let code = ShareCode::parse(raw, &self.rules)?;
        self.inner
            .lock()
            .codes
            .insert(code.clone(), couple_id, expires_at);
        Ok(code)
    }

    /// Expires `code` immediately. Returns false for unknown codes.
    pub fn expire_share_code(&self, code: &ShareCode) -> bool {
        self.inner.lock().codes.expire(code, Utc::now())
    }

    /// Makes the next `calls` calls fail with `Unavailable`.
    pub fn fail_next(&self, calls: u32) {
        self.faults.fail_next(calls);
    }

    /// Delays every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.faults.set_latency(latency);
    }

    /// Members of `couple_id`, in join order.
    #[must_use]
    pub fn members(&self, couple_id: CoupleId) -> Vec<Membership> {
        self.inner
            .lock()
            .workspaces
            .get(&couple_id)
            .map(|workspace| workspace.members.clone())
            .unwrap_or_default()
    }

    /// The stored version of `key` in `couple_id`.
    #[must_use]
    pub fn entity(&self, couple_id: CoupleId, key: EntityKey) -> Option<Revisioned> {
        self.inner
            .lock()
            .workspaces
            .get(&couple_id)
            .and_then(|workspace| workspace.entities.get(&key).cloned())
    }

    /// Number of live subscriptions to `couple_id`.
    #[must_use]
    pub fn subscriber_count(&self, couple_id: CoupleId) -> usize {
        self.inner
            .lock()
            .workspaces
            .get(&couple_id)
            .map_or(0, |workspace| {
                workspace
                    .subscribers
                    .iter()
                    .filter(|tx| !tx.is_closed())
                    .count()
            })
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn lookup_workspace_by_share_code(
        &self,
        code: &ShareCode,
    ) -> Result<Option<CoupleId>, RemoteError> {
        self.faults.enter("lookup_workspace_by_share_code").await?;
        Ok(self.inner.lock().codes.resolve(code, Utc::now()))
    }

    async fn memberships_for(&self, user_id: UserId) -> Result<Vec<Membership>, RemoteError> {
        self.faults.enter("memberships_for").await?;
        let inner = self.inner.lock();
        Ok(inner
            .workspaces
            .values()
            .filter_map(|workspace| workspace.member(user_id).copied())
            .collect())
    }

    async fn fetch_members(&self, couple_id: CoupleId) -> Result<Vec<Membership>, RemoteError> {
        self.faults.enter("fetch_members").await?;
        Ok(self.inner.lock().workspace(couple_id)?.members.clone())
    }

    async fn create_or_confirm_membership(
        &self,
        user_id: UserId,
        couple_id: CoupleId,
        capacity: usize,
    ) -> Result<MembershipReceipt, RemoteError> {
        self.faults.enter("create_or_confirm_membership").await?;
        let mut inner = self.inner.lock();

        let workspace = inner.workspace(couple_id)?;
        if let Some(existing) = workspace.member(user_id) {
            return Ok(MembershipReceipt {
                membership: *existing,
                created: false,
            });
        }
        let capacity = self
            .member_capacity
            .map_or(capacity, |store_cap| store_cap.min(capacity));
        if workspace.members.len() >= capacity {
            return Err(RemoteError::rejected(format!(
                "workspace already has {capacity} members"
            )));
        }

        let joined_at = inner.next_revision();
        let (membership, profile) = inner.add_member(user_id, couple_id)?;
        let workspace = inner.workspace(couple_id)?;
        workspace.broadcast(&ChangeEvent {
            actor: user_id,
            couple_id,
            revision: joined_at,
            change: Change::MemberJoined(membership),
        });
        workspace.broadcast(&ChangeEvent {
            actor: user_id,
            couple_id,
            revision: profile.revision,
            change: Change::Upsert(profile.entity),
        });

        info!(%user_id, %couple_id, "member added");
        Ok(MembershipReceipt {
            membership,
            created: true,
        })
    }

    async fn create_workspace(&self, owner: UserId) -> Result<NewWorkspace, RemoteError> {
        self.faults.enter("create_workspace").await?;
        let mut inner = self.inner.lock();

        let share_code = inner
            .codes
            .generate()
            .map_err(|err| RemoteError::rejected(err.to_string()))?;
        let couple_id = CoupleId::new();
        inner.workspaces.insert(couple_id, Workspace::default());
        let (membership, _) = inner.add_member(owner, couple_id)?;
        inner.codes.insert(share_code.clone(), couple_id, None);

        info!(user_id = %owner, %couple_id, "workspace created");
        Ok(NewWorkspace {
            membership,
            share_code,
        })
    }

    async fn fetch_workspace_entities(
        &self,
        couple_id: CoupleId,
    ) -> Result<Vec<Revisioned>, RemoteError> {
        self.faults.enter("fetch_workspace_entities").await?;
        let mut inner = self.inner.lock();
        Ok(inner.workspace(couple_id)?.entities.values().cloned().collect())
    }

    async fn subscribe(
        &self,
        couple_id: CoupleId,
    ) -> Result<mpsc::Receiver<ChangeEvent>, RemoteError> {
        self.faults.enter("subscribe").await?;
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        self.inner.lock().workspace(couple_id)?.subscribers.push(tx);
        debug!(%couple_id, "subscriber added");
        Ok(rx)
    }

    async fn push(&self, actor: UserId, mutation: Mutation) -> Result<Revision, RemoteError> {
        self.faults.enter("push").await?;
        let couple_id = mutation.couple_id;
        let mut inner = self.inner.lock();

        let workspace = inner.workspace(couple_id)?;
        if workspace.member(actor).is_none() {
            return Err(RemoteError::Forbidden(format!(
                "{actor} is not a member of workspace {couple_id}"
            )));
        }
        if let MutationOp::Upsert(entity) = &mutation.op
            && entity.couple_id() != couple_id
        {
            return Err(RemoteError::rejected("entity belongs to another workspace"));
        }

        let revision = inner.next_revision();
        let workspace = inner.workspace(couple_id)?;
        let change = match mutation.op {
            MutationOp::Upsert(entity) => {
                workspace.entities.insert(
                    entity.key(),
                    Revisioned {
                        entity: entity.clone(),
                        revision,
                    },
                );
                Change::Upsert(entity)
            }
            MutationOp::Remove(key) => {
                workspace.entities.remove(&key);
                Change::Remove(key)
            }
        };

        workspace.broadcast(&ChangeEvent {
            actor,
            couple_id,
            revision,
            change,
        });
        debug!(%actor, %couple_id, %revision, "mutation stored");
        Ok(revision)
    }
}
