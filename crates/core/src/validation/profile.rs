//! Profile validation and name classification.

use crate::entity::{PLACEHOLDER_NAMES, Profile, ProfileStatus};

use super::ValidationContext;
use super::issue::ValidationIssue;
use super::rules::{check_color, check_name};

/// Classifies a profile name.
///
/// Exactly one of the placeholder names is `Unconfigured`; any other
/// non-blank name is `Configured`.
///
/// # Errors
///
/// A blank name is invalid, not merely unconfigured.
pub fn classify_profile_name(name: &str) -> Result<ProfileStatus, ValidationIssue> {
    if name.trim().is_empty() {
        return Err(ValidationIssue::Blank { field: "name" });
    }

    if PLACEHOLDER_NAMES.contains(&name) {
        Ok(ProfileStatus::Unconfigured)
    } else {
        Ok(ProfileStatus::Configured)
    }
}

/// Validates a profile.
#[must_use]
pub fn validate_profile(profile: &Profile, ctx: &ValidationContext<'_>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_name("name", &profile.name, ctx, &mut issues);
    check_color(profile.color.as_deref(), &mut issues);

    if let Some(user_id) = profile.user_id {
        let linked_elsewhere = ctx
            .lookup
            .profiles()
            .iter()
            .any(|other| other.id != profile.id && other.user_id == Some(user_id));
        if linked_elsewhere {
            issues.push(ValidationIssue::ProfileAlreadyLinked(user_id));
        }
    }

    issues
}
