//! Referential checks for entity removal.

use crate::entity::{EntityKey, EntityKind};

use super::issue::ValidationIssue;
use super::lookup::EntityLookup;

/// Lists the entities still referencing `key`; one issue per referencer.
pub(super) fn references_to(key: EntityKey, lookup: &dyn EntityLookup) -> Vec<ValidationIssue> {
    let id = key.id;
    let mut by = Vec::new();

    match key.kind {
        EntityKind::Profile => {
            by.extend(
                lookup
                    .expenses()
                    .into_iter()
                    .filter(|e| e.paid_by.into_inner() == id)
                    .map(|e| e.key()),
            );
            by.extend(
                lookup
                    .cards()
                    .into_iter()
                    .filter(|c| c.owner.is_some_and(|owner| owner.into_inner() == id))
                    .map(|c| c.key()),
            );
            by.extend(
                lookup
                    .agreements()
                    .into_iter()
                    .filter(|a| a.shares.iter().any(|s| s.profile_id.into_inner() == id))
                    .map(|a| a.key()),
            );
            by.extend(
                lookup
                    .settlements()
                    .into_iter()
                    .filter(|s| s.from.into_inner() == id || s.to.into_inner() == id)
                    .map(|s| s.key()),
            );
        }
        EntityKind::Tag => by.extend(
            lookup
                .expenses()
                .into_iter()
                .filter(|e| e.tag_ids.iter().any(|t| t.into_inner() == id))
                .map(|e| e.key()),
        ),
        EntityKind::Card => by.extend(
            lookup
                .expenses()
                .into_iter()
                .filter(|e| e.card_id.is_some_and(|c| c.into_inner() == id))
                .map(|e| e.key()),
        ),
        EntityKind::Expense => {
            by.extend(
                lookup
                    .agreements()
                    .into_iter()
                    .filter(|a| a.expense_ids.iter().any(|e| e.into_inner() == id))
                    .map(|a| a.key()),
            );
            by.extend(
                lookup
                    .settlements()
                    .into_iter()
                    .filter(|s| s.expense_ids.iter().any(|e| e.into_inner() == id))
                    .map(|s| s.key()),
            );
        }
        EntityKind::Agreement | EntityKind::Settlement => {}
    }

    by.into_iter()
        .map(|by| ValidationIssue::StillReferenced { key, by })
        .collect()
}
