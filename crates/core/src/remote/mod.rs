//! Contract required from the remote data store.
//!
//! Persistence, transport and realtime delivery live outside this crate. The
//! core only needs the request/response and subscription primitives below;
//! every call goes through [`crate::access::boundary`], which adds the
//! timeout and bounded retry.

mod error;
mod event;

use async_trait::async_trait;
use casal_shared::types::{CoupleId, Revision, UserId};
use tokio::sync::mpsc;

use crate::access::ShareCode;
use crate::workspace::Mutation;

pub use error::RemoteError;
pub use event::{Change, ChangeEvent, Membership, MembershipReceipt, NewWorkspace, Revisioned};

/// Remote data store shared by both members of a workspace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Looks up the workspace a share code points to.
    ///
    /// Returns `None` for unknown and expired codes.
    async fn lookup_workspace_by_share_code(
        &self,
        code: &ShareCode,
    ) -> Result<Option<CoupleId>, RemoteError>;

    /// Lists every membership held by `user_id`.
    async fn memberships_for(&self, user_id: UserId) -> Result<Vec<Membership>, RemoteError>;

    /// Lists the members of a workspace.
    async fn fetch_members(&self, couple_id: CoupleId) -> Result<Vec<Membership>, RemoteError>;

    /// Creates the membership (and the member's profile) or confirms an existing one.
    ///
    /// A new membership is refused with `Rejected` when the workspace already
    /// has `capacity` members. The check and the insert must be atomic.
    async fn create_or_confirm_membership(
        &self,
        user_id: UserId,
        couple_id: CoupleId,
        capacity: usize,
    ) -> Result<MembershipReceipt, RemoteError>;

    /// Creates a workspace owned by `owner`, with its first profile and a share code.
    async fn create_workspace(&self, owner: UserId) -> Result<NewWorkspace, RemoteError>;

    /// Fetches every entity of a workspace with its current revision.
    async fn fetch_workspace_entities(
        &self,
        couple_id: CoupleId,
    ) -> Result<Vec<Revisioned>, RemoteError>;

    /// Subscribes to change events of a workspace.
    ///
    /// The channel closes when the store drops the subscriber (e.g. because
    /// it fell behind); the client then reopens the workspace.
    async fn subscribe(
        &self,
        couple_id: CoupleId,
    ) -> Result<mpsc::Receiver<ChangeEvent>, RemoteError>;

    /// Writes a mutation on behalf of `actor`, returning the assigned revision.
    async fn push(&self, actor: UserId, mutation: Mutation) -> Result<Revision, RemoteError>;
}
