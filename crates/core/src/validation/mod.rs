//! Entity validators.
//!
//! Every entity passes through [`validate`] before it is accepted into a
//! workspace, whether the mutation originated locally or arrived from the
//! other member. Validators are synchronous, deterministic and side-effect
//! free: all they see is the [`ValidationContext`].
//!
//! # Modules
//!
//! - `issue` - One error variant per rule
//! - `lookup` - Read-only view over the workspace's entities
//! - `balance` - Pairwise outstanding balances
//! - `color` - Color token format
//! - one module per entity kind, plus `removal`

pub mod balance;
pub mod color;
pub mod issue;
pub mod lookup;

mod agreement;
mod expense;
mod naming;
mod profile;
mod removal;
mod rules;
mod settlement;

#[cfg(test)]
mod validation_props;

use casal_shared::config::ValidationConfig;
use casal_shared::types::CoupleId;
use casal_shared::AppError;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::entity::{Entity, EntityKey};

pub use agreement::validate_agreement;
pub use expense::validate_expense;
pub use issue::ValidationIssue;
pub use lookup::EntityLookup;
pub use naming::{validate_card, validate_tag};
pub use profile::{classify_profile_name, validate_profile};
pub use settlement::validate_settlement;

/// Tunable validation thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// How many days past today an expense or settlement date may be.
    pub max_future_days: u32,
    /// Longest accepted display name, in characters.
    pub max_name_len: usize,
    /// Largest accepted expense or settlement amount.
    pub max_amount: Decimal,
    /// Reject settlements larger than the outstanding pairwise balance.
    pub enforce_settlement_balance: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

impl From<&ValidationConfig> for ValidationPolicy {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            max_future_days: config.max_future_days,
            max_name_len: config.max_name_len,
            max_amount: Decimal::from(config.max_amount),
            enforce_settlement_balance: config.enforce_settlement_balance,
        }
    }
}

/// Everything a validator may consult.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Workspace the entity is entering.
    pub couple_id: CoupleId,
    /// Current entities of that workspace.
    pub lookup: &'a dyn EntityLookup,
    /// Reference date for future-date bounds.
    pub today: NaiveDate,
    /// Thresholds.
    pub policy: &'a ValidationPolicy,
}

/// Outcome of validating one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Wraps the issues found by a validator.
    #[must_use]
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// True when no rule was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// The violated rules.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// One human-readable message per violated rule.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// True when the report contains an issue with the given code.
    #[must_use]
    pub fn has(&self, code: &str) -> bool {
        self.issues.iter().any(|issue| issue.code() == code)
    }

    /// Converts the report into `Invalid` when any rule was violated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Invalid` carrying every message.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AppError::Invalid(self.errors()))
        }
    }
}

/// Validates an entity entering the workspace named in `ctx`.
#[must_use]
pub fn validate(entity: &Entity, ctx: &ValidationContext<'_>) -> ValidationReport {
    let mut issues = Vec::new();

    if entity.couple_id() != ctx.couple_id {
        issues.push(ValidationIssue::WorkspaceMismatch {
            expected: ctx.couple_id,
            found: entity.couple_id(),
        });
    }

    issues.extend(match entity {
        Entity::Expense(expense) => validate_expense(expense, ctx),
        Entity::Profile(profile) => validate_profile(profile, ctx),
        Entity::Tag(tag) => validate_tag(tag, ctx),
        Entity::Card(card) => validate_card(card, ctx),
        Entity::Agreement(agreement) => validate_agreement(agreement, ctx),
        Entity::Settlement(settlement) => validate_settlement(settlement, ctx),
    });

    ValidationReport::new(issues)
}

/// Validates removing the entity stored under `key`.
///
/// Removal never cascades, so an entity still referenced by another one is
/// rejected.
#[must_use]
pub fn validate_removal(key: EntityKey, lookup: &dyn EntityLookup) -> ValidationReport {
    ValidationReport::new(removal::references_to(key, lookup))
}
