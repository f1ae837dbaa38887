//! Rules shared by several entity validators.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::ValidationContext;
use super::color::is_color_token;
use super::issue::ValidationIssue;

/// Money amounts are kept to whole cents.
const MAX_AMOUNT_SCALE: u32 = 2;

/// Required, length-bounded display text.
pub(super) fn check_name(
    field: &'static str,
    value: &str,
    ctx: &ValidationContext<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        issues.push(ValidationIssue::Blank { field });
    } else if trimmed.chars().count() > ctx.policy.max_name_len {
        issues.push(ValidationIssue::TooLong {
            field,
            max: ctx.policy.max_name_len,
        });
    }
}

/// Strictly positive, at most cent precision, not above the policy ceiling.
pub(super) fn check_amount(
    field: &'static str,
    amount: Decimal,
    ctx: &ValidationContext<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    if amount <= Decimal::ZERO {
        issues.push(ValidationIssue::AmountNotPositive { field });
        return;
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        issues.push(ValidationIssue::AmountPrecision { field });
    }
    if amount > ctx.policy.max_amount {
        issues.push(ValidationIssue::AmountTooLarge {
            field,
            max: ctx.policy.max_amount,
        });
    }
}

/// Not later than `today + max_future_days`.
pub(super) fn check_date(
    field: &'static str,
    date: NaiveDate,
    ctx: &ValidationContext<'_>,
    issues: &mut Vec<ValidationIssue>,
) {
    let latest = latest_accepted_date(ctx.today, ctx.policy.max_future_days);
    if date > latest {
        issues.push(ValidationIssue::DateTooFarInFuture {
            field,
            date,
            latest,
        });
    }
}

/// Optional color must be a recognized token when present.
pub(super) fn check_color(color: Option<&str>, issues: &mut Vec<ValidationIssue>) {
    if let Some(color) = color {
        if !is_color_token(color) {
            issues.push(ValidationIssue::InvalidColor(color.to_string()));
        }
    }
}

/// Comparison key for case-insensitive name uniqueness.
pub(super) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub(super) fn latest_accepted_date(today: NaiveDate, max_future_days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(max_future_days)))
        .unwrap_or(NaiveDate::MAX)
}
