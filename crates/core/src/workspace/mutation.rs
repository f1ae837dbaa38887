//! Local writes to a workspace.

use casal_shared::types::CoupleId;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKey};

/// What a mutation does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum MutationOp {
    /// Create or replace an entity.
    Upsert(Entity),
    /// Remove an entity.
    Remove(EntityKey),
}

/// A write targeting one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Targeted workspace.
    pub couple_id: CoupleId,
    /// The write.
    pub op: MutationOp,
}

impl Mutation {
    /// Upsert into the workspace the entity belongs to.
    #[must_use]
    pub fn upsert(entity: impl Into<Entity>) -> Self {
        let entity = entity.into();
        Self {
            couple_id: entity.couple_id(),
            op: MutationOp::Upsert(entity),
        }
    }

    /// Removal from `couple_id`.
    #[must_use]
    pub const fn remove(couple_id: CoupleId, key: EntityKey) -> Self {
        Self {
            couple_id,
            op: MutationOp::Remove(key),
        }
    }

    /// Key of the affected entity.
    #[must_use]
    pub const fn key(&self) -> EntityKey {
        match &self.op {
            MutationOp::Upsert(entity) => entity.key(),
            MutationOp::Remove(key) => *key,
        }
    }
}
