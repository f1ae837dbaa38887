//! Expense validation.

use crate::entity::Expense;

use super::ValidationContext;
use super::issue::ValidationIssue;
use super::rules::{check_amount, check_date};

/// Validates an expense.
///
/// Rules: non-blank description, positive bounded cent-precision amount, existing
/// payer, date within the future bound, existing tags and card.
#[must_use]
pub fn validate_expense(expense: &Expense, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if expense.description.trim().is_empty() {
        issues.push(ValidationIssue::Blank {
            field: "description",
        });
    }

    check_amount("amount", expense.amount, ctx, &mut issues);

    if ctx.lookup.profile(expense.paid_by).is_none() {
        issues.push(ValidationIssue::UnknownProfile {
            field: "paid_by",
            id: expense.paid_by,
        });
    }

    check_date("date", expense.date, ctx, &mut issues);

    for tag_id in &expense.tag_ids {
        if ctx.lookup.tag(*tag_id).is_none() {
            issues.push(ValidationIssue::UnknownTag(*tag_id));
        }
    }

    if let Some(card_id) = expense.card_id {
        if ctx.lookup.card(card_id).is_none() {
            issues.push(ValidationIssue::UnknownCard(card_id));
        }
    }

    issues
}
