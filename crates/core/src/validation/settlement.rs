//! Settlement validation.

use crate::entity::Settlement;

use super::ValidationContext;
use super::balance::outstanding;
use super::issue::ValidationIssue;
use super::rules::{check_amount, check_date};

/// Validates a settlement.
///
/// The balance ceiling only applies when the policy enables it.
#[must_use]
pub fn validate_settlement(
    settlement: &Settlement,
    ctx: &ValidationContext<'_>,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if settlement.from == settlement.to {
        issues.push(ValidationIssue::SelfSettlement);
    }

    check_amount("amount", settlement.amount, ctx, &mut issues);

    for (field, id) in [("from", settlement.from), ("to", settlement.to)] {
        if ctx.lookup.profile(id).is_none() {
            issues.push(ValidationIssue::UnknownProfile { field, id });
        }
    }

    check_date("date", settlement.date, ctx, &mut issues);

    for expense_id in &settlement.expense_ids {
        if ctx.lookup.expense(*expense_id).is_none() {
            issues.push(ValidationIssue::UnknownExpense(*expense_id));
        }
    }

    if ctx.policy.enforce_settlement_balance && issues.is_empty() {
        let owed = outstanding(ctx.lookup, settlement.from, settlement.to, Some(settlement.id));
        if settlement.amount > owed {
            issues.push(ValidationIssue::ExceedsOutstandingBalance {
                amount: settlement.amount,
                outstanding: owed,
            });
        }
    }

    issues
}
