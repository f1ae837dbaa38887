//! Property-based tests for entity validation rules.

use casal_shared::types::{CoupleId, TagId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::test_support::{expense, profile, today};
use super::{
    ValidationContext, ValidationIssue, ValidationPolicy, classify_profile_name, validate,
};
use crate::entity::{Entity, PLACEHOLDER_NAMES, ProfileStatus, Tag};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a zero or negative amount.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* expense with a positive cent amount and an existing payer,
    /// validation SHALL accept it.
    #[test]
    fn prop_positive_expense_accepted(amount in positive_amount()) {
        let couple_id = CoupleId::new();
        let payer = profile(couple_id, "Ana");
        let entities = vec![Entity::from(payer.clone())];
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext { couple_id, lookup: &entities, today: today(), policy: &policy };

        let report = validate(&Entity::from(expense(couple_id, payer.id, amount)), &ctx);
        prop_assert!(report.is_valid(), "unexpected issues: {:?}", report.issues());
    }

    /// *For any* expense with amount <= 0, validation SHALL reject it with a
    /// message attributable to the amount rule.
    #[test]
    fn prop_non_positive_expense_rejected(amount in non_positive_amount()) {
        let couple_id = CoupleId::new();
        let payer = profile(couple_id, "Ana");
        let entities = vec![Entity::from(payer.clone())];
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext { couple_id, lookup: &entities, today: today(), policy: &policy };

        let report = validate(&Entity::from(expense(couple_id, payer.id, amount)), &ctx);
        prop_assert!(report.has("AMOUNT_NOT_POSITIVE"));
        prop_assert!(report.errors().iter().any(|e| e == "amount must be a positive number"));
    }

    /// *For any* non-blank name other than the placeholders, the profile is configured.
    #[test]
    fn prop_non_placeholder_names_are_configured(name in "[A-Za-z][A-Za-z0-9 ]{0,20}") {
        prop_assume!(!PLACEHOLDER_NAMES.contains(&name.as_str()));
        prop_assert_eq!(classify_profile_name(&name), Ok(ProfileStatus::Configured));
    }

    /// *For any* whitespace-only name, classification fails instead of
    /// reporting the profile as unconfigured.
    #[test]
    fn prop_blank_names_are_invalid(name in "[ \t]{0,8}") {
        prop_assert_eq!(
            classify_profile_name(&name),
            Err(ValidationIssue::Blank { field: "name" })
        );
    }

    /// *For any* existing tag name, a second tag differing only in case is a duplicate.
    #[test]
    fn prop_tag_names_unique_ignoring_case(name in "[a-z]{1,12}", upper in any::<bool>()) {
        let couple_id = CoupleId::new();
        let existing = Tag { id: TagId::new(), couple_id, name: name.clone(), color: None };
        let entities = vec![Entity::from(existing)];
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext { couple_id, lookup: &entities, today: today(), policy: &policy };

        let submitted = if upper { name.to_uppercase() } else { name };
        let clash = Tag { id: TagId::new(), couple_id, name: submitted, color: None };
        prop_assert!(validate(&Entity::from(clash), &ctx).has("DUPLICATE_NAME"));
    }
}
