//! Read-only view of workspace entities used by validators.

use casal_shared::types::{CardId, ExpenseId, ProfileId, TagId};

use crate::entity::{Agreement, Card, Entity, Expense, Profile, Settlement, Tag};

/// Read access to the entities of one workspace.
///
/// Validators only ever read through this trait, so they stay pure and
/// never reach past the state already loaded on the client.
pub trait EntityLookup {
    /// Finds a profile by ID.
    fn profile(&self, id: ProfileId) -> Option<&Profile>;
    /// Finds an expense by ID.
    fn expense(&self, id: ExpenseId) -> Option<&Expense>;
    /// Finds a tag by ID.
    fn tag(&self, id: TagId) -> Option<&Tag>;
    /// Finds a card by ID.
    fn card(&self, id: CardId) -> Option<&Card>;
    /// All profiles.
    fn profiles(&self) -> Vec<&Profile>;
    /// All expenses.
    fn expenses(&self) -> Vec<&Expense>;
    /// All tags.
    fn tags(&self) -> Vec<&Tag>;
    /// All cards.
    fn cards(&self) -> Vec<&Card>;
    /// All agreements.
    fn agreements(&self) -> Vec<&Agreement>;
    /// All settlements.
    fn settlements(&self) -> Vec<&Settlement>;
}

macro_rules! slice_filter {
    ($slice:expr, $variant:ident) => {
        $slice
            .iter()
            .filter_map(|entity| match entity {
                Entity::$variant(inner) => Some(inner),
                _ => None,
            })
    };
}

/// Linear-scan lookup over a plain list of entities, e.g. a fetched snapshot.
impl EntityLookup for Vec<Entity> {
    fn profile(&self, id: ProfileId) -> Option<&Profile> {
        slice_filter!(self, Profile).find(|p| p.id == id)
    }

    fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        slice_filter!(self, Expense).find(|e| e.id == id)
    }

    fn tag(&self, id: TagId) -> Option<&Tag> {
        slice_filter!(self, Tag).find(|t| t.id == id)
    }

    fn card(&self, id: CardId) -> Option<&Card> {
        slice_filter!(self, Card).find(|c| c.id == id)
    }

    fn profiles(&self) -> Vec<&Profile> {
        slice_filter!(self, Profile).collect()
    }

    fn expenses(&self) -> Vec<&Expense> {
        slice_filter!(self, Expense).collect()
    }

    fn tags(&self) -> Vec<&Tag> {
        slice_filter!(self, Tag).collect()
    }

    fn cards(&self) -> Vec<&Card> {
        slice_filter!(self, Card).collect()
    }

    fn agreements(&self) -> Vec<&Agreement> {
        slice_filter!(self, Agreement).collect()
    }

    fn settlements(&self) -> Vec<&Settlement> {
        slice_filter!(self, Settlement).collect()
    }
}
