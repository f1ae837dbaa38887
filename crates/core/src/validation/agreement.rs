//! Agreement validation.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::entity::Agreement;

use super::ValidationContext;
use super::issue::ValidationIssue;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Validates an agreement.
///
/// Shares must be positive, at most 100 percent each, one per profile,
/// sum to exactly 100 and name existing profiles. Covered expenses must exist
/// and may belong to only one agreement.
#[must_use]
pub fn validate_agreement(
    agreement: &Agreement,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if agreement.title.trim().is_empty() {
        issues.push(ValidationIssue::Blank { field: "title" });
    }

    if agreement.shares.is_empty() {
        issues.push(ValidationIssue::NoShares);
    } else {
        let mut seen = HashSet::new();
        let mut total = Decimal::ZERO;

        for share in &agreement.shares {
            if share.percent <= Decimal::ZERO || share.percent > HUNDRED {
                issues.push(ValidationIssue::ShareOutOfRange {
                    profile_id: share.profile_id,
                    percent: share.percent,
                });
            }
            if !seen.insert(share.profile_id) {
                issues.push(ValidationIssue::DuplicateShare(share.profile_id));
            }
            if ctx.lookup.profile(share.profile_id).is_none() {
                issues.push(ValidationIssue::UnknownProfile {
                    field: "shares",
                    id: share.profile_id,
                });
            }
            total = total.saturating_add(share.percent);
        }

        if total != HUNDRED {
            issues.push(ValidationIssue::SharesDoNotSumToHundred { total });
        }
    }

    let others: Vec<_> = ctx
        .lookup
        .agreements()
        .into_iter()
        .filter(|other| other.id != agreement.id)
        .collect();

    for expense_id in &agreement.expense_ids {
        if ctx.lookup.expense(*expense_id).is_none() {
            issues.push(ValidationIssue::UnknownExpense(*expense_id));
            continue;
        }
        if let Some(covering) = others.iter().find(|a| a.expense_ids.contains(expense_id)) {
            issues.push(ValidationIssue::ExpenseAlreadyCovered {
                expense_id: *expense_id,
                agreement_id: covering.id,
            });
        }
    }

    issues
}
