//! Tag and card validation.
//!
//! Both are named, optionally colored labels whose names must be unique
//! within the workspace, compared case-insensitively after trimming.

use crate::entity::{Card, EntityKind, Tag};

use super::ValidationContext;
use super::issue::ValidationIssue;
use super::rules::{check_color, check_name, name_key};

/// Validates a tag.
#[must_use]
pub fn validate_tag(tag: &Tag, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_name("name", &tag.name, ctx, &mut issues);
    check_color(tag.color.as_deref(), &mut issues);

    let key = name_key(&tag.name);
    let taken = ctx
        .lookup
        .tags()
        .iter()
        .any(|other| other.id != tag.id && name_key(&other.name) == key);
    if taken && !key.is_empty() {
        issues.push(ValidationIssue::DuplicateName {
            kind: EntityKind::Tag,
            name: tag.name.trim().to_string(),
        });
    }

    issues
}

/// Validates a card.
///
/// Besides the naming rules, the holder must exist and statement days must
/// fall within a month.
#[must_use]
pub fn validate_card(card: &Card, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_name("name", &card.name, ctx, &mut issues);
    check_color(card.color.as_deref(), &mut issues);

    let key = name_key(&card.name);
    let taken = ctx
        .lookup
        .cards()
        .iter()
        .any(|other| other.id != card.id && name_key(&other.name) == key);
    if taken && !key.is_empty() {
        issues.push(ValidationIssue::DuplicateName {
            kind: EntityKind::Card,
            name: card.name.trim().to_string(),
        });
    }

    if let Some(owner) = card.owner {
        if ctx.lookup.profile(owner).is_none() {
            issues.push(ValidationIssue::UnknownProfile {
                field: "owner",
                id: owner,
            });
        }
    }

    for (field, day) in [("closing_day", card.closing_day), ("due_day", card.due_day)] {
        if let Some(day) = day {
            if !(1..=31).contains(&day) {
                issues.push(ValidationIssue::DayOutOfRange { field, day });
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::validation::ValidationPolicy;
    use crate::validation::test_support::today;
    use casal_shared::types::{CardId, CoupleId, ProfileId, TagId};
    use rstest::rstest;

    fn tag(couple_id: CoupleId, name: &str) -> Tag {
        Tag {
            id: TagId::new(),
            couple_id,
            name: name.to_string(),
            color: None,
        }
    }

    fn card(couple_id: CoupleId, name: &str) -> Card {
        Card {
            id: CardId::new(),
            couple_id,
            name: name.to_string(),
            color: Some("violet".to_string()),
            owner: None,
            closing_day: Some(3),
            due_day: Some(10),
        }
    }

    #[rstest]
    #[case("Casa")]
    #[case("casa")]
    #[case("  CASA ")]
    fn test_duplicate_tag_name_is_case_insensitive(#[case] name: &str) {
        let couple_id = CoupleId::new();
        let entities = vec![Entity::from(tag(couple_id, "Casa"))];
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext {
            couple_id,
            lookup: &entities,
            today: today(),
            policy: &policy,
        };

        let issues = validate_tag(&tag(couple_id, name), &ctx);
        assert_eq!(
            issues,
            vec![ValidationIssue::DuplicateName {
                kind: EntityKind::Tag,
                name: name.trim().to_string(),
            }]
        );
    }

    #[test]
    fn test_renaming_tag_to_its_own_name_is_allowed() {
        let couple_id = CoupleId::new();
        let existing = tag(couple_id, "Casa");
        let entities = vec![Entity::from(existing.clone())];
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext {
            couple_id,
            lookup: &entities,
            today: today(),
            policy: &policy,
        };

        let mut renamed = existing;
        renamed.name = "CASA".to_string();
        renamed.color = Some("#0af".to_string());
        assert!(validate_tag(&renamed, &ctx).is_empty());
    }

    #[test]
    fn test_card_rules() {
        let couple_id = CoupleId::new();
        let entities = vec![Entity::from(card(couple_id, "Nubank"))];
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext {
            couple_id,
            lookup: &entities,
            today: today(),
            policy: &policy,
        };

        assert!(validate_card(&card(couple_id, "Itaú"), &ctx).is_empty());

        let owner = ProfileId::new();
        let mut bad = card(couple_id, "nubank");
        bad.owner = Some(owner);
        bad.closing_day = Some(0);
        bad.due_day = Some(32);
        bad.color = Some("#zzzzzz".to_string());

        let codes: Vec<_> = validate_card(&bad, &ctx).iter().map(ValidationIssue::code).collect();
        assert_eq!(
            codes,
            vec![
                "INVALID_COLOR",
                "DUPLICATE_NAME",
                "UNKNOWN_PROFILE",
                "DAY_OUT_OF_RANGE",
                "DAY_OUT_OF_RANGE",
            ]
        );
    }

    #[test]
    fn test_tag_and_card_names_do_not_clash() {
        let couple_id = CoupleId::new();
        let entities = vec![Entity::from(card(couple_id, "Casa"))];
        let policy = ValidationPolicy::default();
        let ctx = ValidationContext {
            couple_id,
            lookup: &entities,
            today: today(),
            policy: &policy,
        };
        assert!(validate_tag(&tag(couple_id, "Casa"), &ctx).is_empty());
    }
}
