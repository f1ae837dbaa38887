//! Pairwise outstanding balances.
//!
//! Each expense is split by the agreement covering it, or equally among all
//! profiles when no agreement covers it. Settlements then reduce (or, in the
//! opposite direction, increase) what one profile owes another.

use casal_shared::types::{ProfileId, SettlementId};
use rust_decimal::Decimal;

use crate::entity::Expense;

use super::lookup::EntityLookup;

/// Share of `expense` borne by `profile_id`.
#[must_use]
pub fn share_of(lookup: &dyn EntityLookup, expense: &Expense, profile_id: ProfileId) -> Decimal {
    let covering = lookup
        .agreements()
        .into_iter()
        .find(|agreement| agreement.expense_ids.contains(&expense.id));

    match covering {
        Some(agreement) => agreement
            .shares
            .iter()
            .find(|share| share.profile_id == profile_id)
            .map_or(Decimal::ZERO, |share| {
                expense
                    .amount
                    .saturating_mul(share.percent)
                    .checked_div(Decimal::ONE_HUNDRED)
                    .unwrap_or(Decimal::ZERO)
            }),
        None => {
            let profiles = lookup.profiles();
            if !profiles.iter().any(|p| p.id == profile_id) {
                return Decimal::ZERO;
            }
            let count = Decimal::from(profiles.len());
            expense.amount.checked_div(count).unwrap_or(Decimal::ZERO)
        }
    }
}

/// What `debtor` still owes `creditor`, rounded to cents, never negative.
///
/// Sums saturate at the `Decimal` bounds instead of overflowing.
///
/// `exclude` leaves one settlement out of the sum, so an edited settlement is
/// checked against the balance without its own previous amount.
#[must_use]
pub fn outstanding(
    lookup: &dyn EntityLookup,
    debtor: ProfileId,
    creditor: ProfileId,
    exclude: Option<SettlementId>,
) -> Decimal {
    let mut owed = Decimal::ZERO;

    for expense in lookup.expenses() {
        if expense.paid_by == creditor {
            owed = owed.saturating_add(share_of(lookup, expense, debtor));
        } else if expense.paid_by == debtor {
            owed = owed.saturating_sub(share_of(lookup, expense, creditor));
        }
    }

    for settlement in lookup.settlements() {
        if Some(settlement.id) == exclude {
            continue;
        }
        if settlement.from == debtor && settlement.to == creditor {
            owed = owed.saturating_sub(settlement.amount);
        } else if settlement.from == creditor && settlement.to == debtor {
            owed = owed.saturating_add(settlement.amount);
        }
    }

    owed.round_dp(2).max(Decimal::ZERO)
}
