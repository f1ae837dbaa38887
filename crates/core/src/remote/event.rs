//! Records exchanged with the remote store.

use casal_shared::types::{CoupleId, ProfileId, Revision, UserId};
use serde::{Deserialize, Serialize};

use crate::access::ShareCode;
use crate::entity::{Entity, EntityKey};

/// Durable relation letting an identity act on a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    /// Member identity.
    pub user_id: UserId,
    /// Workspace.
    pub couple_id: CoupleId,
    /// The member's profile in that workspace.
    pub profile_id: ProfileId,
}

/// Result of creating or confirming a membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipReceipt {
    /// The membership as stored.
    pub membership: Membership,
    /// True if this call created the membership and its profile.
    pub created: bool,
}

/// A freshly created workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkspace {
    /// Creator's membership.
    pub membership: Membership,
    /// Code the partner uses to join.
    pub share_code: ShareCode,
}

/// An entity together with the revision of its last write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revisioned {
    /// The entity.
    pub entity: Entity,
    /// Revision of its last write.
    pub revision: Revision,
}

/// What changed in a [`ChangeEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Change {
    /// Entity created or replaced.
    Upsert(Entity),
    /// Entity removed.
    Remove(EntityKey),
    /// A new member joined the workspace.
    MemberJoined(Membership),
}

/// A write to a workspace, pushed by the remote store to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Identity that made the write.
    pub actor: UserId,
    /// Workspace written to.
    pub couple_id: CoupleId,
    /// Revision assigned by the store.
    pub revision: Revision,
    /// The write.
    pub change: Change,
}
