//! Entity kinds and storage keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminant of [`super::Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A member profile.
    Profile,
    /// A tag.
    Tag,
    /// A payment card.
    Card,
    /// An expense.
    Expense,
    /// A split agreement.
    Agreement,
    /// A settlement between two profiles.
    Settlement,
}

impl EntityKind {
    /// All kinds, ordered so that referenced kinds come before referencing ones.
    pub const LOAD_ORDER: [Self; 6] = [
        Self::Profile,
        Self::Tag,
        Self::Card,
        Self::Expense,
        Self::Agreement,
        Self::Settlement,
    ];

    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Tag => "tag",
            Self::Card => "card",
            Self::Expense => "expense",
            Self::Agreement => "agreement",
            Self::Settlement => "settlement",
        }
    }

    /// Position in [`Self::LOAD_ORDER`].
    #[must_use]
    pub const fn load_rank(&self) -> u8 {
        match self {
            Self::Profile => 0,
            Self::Tag => 1,
            Self::Card => 2,
            Self::Expense => 3,
            Self::Agreement => 4,
            Self::Settlement => 5,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a stored entity within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    /// Entity kind.
    pub kind: EntityKind,
    /// Raw entity id.
    pub id: Uuid,
}

impl EntityKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(kind: EntityKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
