//! Validation issue types.
//!
//! One variant per rule; every rejected entity carries one issue per rule it
//! violates, each with a stable code.

use casal_shared::types::{AgreementId, CardId, CoupleId, ExpenseId, ProfileId, TagId, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::entity::{EntityKey, EntityKind};

/// A single violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    // ========== Ownership ==========
    /// Entity belongs to another workspace.
    #[error("entity belongs to workspace {found}, expected {expected}")]
    WorkspaceMismatch {
        /// Workspace being mutated.
        expected: CoupleId,
        /// Workspace named by the entity.
        found: CoupleId,
    },

    // ========== Text ==========
    /// Required text is empty after trimming.
    #[error("{field} must not be empty")]
    Blank {
        /// Offending field.
        field: &'static str,
    },

    /// Text is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// Name already used by another entity of the same kind.
    #[error("a {kind} named '{name}' already exists")]
    DuplicateName {
        /// Kind being named.
        kind: EntityKind,
        /// The clashing name as submitted.
        name: String,
    },

    /// Color is not a recognized token.
    #[error("'{0}' is not a recognized color token")]
    InvalidColor(String),

    // ========== Amounts & dates ==========
    /// Amount is zero or negative.
    #[error("{field} must be a positive number")]
    AmountNotPositive {
        /// Offending field.
        field: &'static str,
    },

    /// Amount has sub-cent precision.
    #[error("{field} must have at most 2 decimal places")]
    AmountPrecision {
        /// Offending field.
        field: &'static str,
    },

    /// Amount is above the policy ceiling.
    #[error("{field} must be at most {max}")]
    AmountTooLarge {
        /// Offending field.
        field: &'static str,
        /// Largest accepted amount.
        max: Decimal,
    },

    /// Date is further in the future than the policy allows.
    #[error("{field} {date} is after the latest accepted date {latest}")]
    DateTooFarInFuture {
        /// Offending field.
        field: &'static str,
        /// Submitted date.
        date: NaiveDate,
        /// Latest accepted date.
        latest: NaiveDate,
    },

    /// Day of month outside 1..=31.
    #[error("{field} must be between 1 and 31, got {day}")]
    DayOutOfRange {
        /// Offending field.
        field: &'static str,
        /// Submitted day.
        day: u8,
    },

    // ========== References ==========
    /// Referenced profile does not exist in the workspace.
    #[error("{field} references unknown profile {id}")]
    UnknownProfile {
        /// Referencing field.
        field: &'static str,
        /// Missing profile.
        id: ProfileId,
    },

    /// Referenced tag does not exist in the workspace.
    #[error("unknown tag {0}")]
    UnknownTag(TagId),

    /// Referenced card does not exist in the workspace.
    #[error("unknown card {0}")]
    UnknownCard(CardId),

    /// Referenced expense does not exist in the workspace.
    #[error("unknown expense {0}")]
    UnknownExpense(ExpenseId),

    /// Identity already has another profile in the workspace.
    #[error("user {0} already has a profile in this workspace")]
    ProfileAlreadyLinked(UserId),

    // ========== Agreements ==========
    /// Agreement has no shares.
    #[error("agreement must have at least one share")]
    NoShares,

    /// Share percent outside (0, 100].
    #[error("share of profile {profile_id} must be above 0 and at most 100 percent, got {percent}")]
    ShareOutOfRange {
        /// Profile of the share.
        profile_id: ProfileId,
        /// Submitted percent.
        percent: Decimal,
    },

    /// Same profile listed twice.
    #[error("profile {0} has more than one share")]
    DuplicateShare(ProfileId),

    /// Shares do not add up to 100 percent.
    #[error("shares must add up to 100 percent, got {total}")]
    SharesDoNotSumToHundred {
        /// Sum of submitted shares.
        total: Decimal,
    },

    /// Expense is already split under another agreement.
    #[error("expense {expense_id} is already covered by agreement {agreement_id}")]
    ExpenseAlreadyCovered {
        /// The expense.
        expense_id: ExpenseId,
        /// The agreement covering it.
        agreement_id: AgreementId,
    },

    // ========== Settlements ==========
    /// Payer and payee are the same profile.
    #[error("settlement must be between two different profiles")]
    SelfSettlement,

    /// Settlement exceeds what the payer owes the payee.
    #[error("settlement of {amount} exceeds the outstanding balance of {outstanding}")]
    ExceedsOutstandingBalance {
        /// Submitted amount.
        amount: Decimal,
        /// Outstanding pairwise balance.
        outstanding: Decimal,
    },

    // ========== Removal ==========
    /// Entity cannot be removed while others reference it.
    #[error("{key} is still referenced by {by}")]
    StillReferenced {
        /// Entity being removed.
        key: EntityKey,
        /// First referencing entity found.
        by: EntityKey,
    },
}

impl ValidationIssue {
    /// Returns the stable code of the violated rule.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::WorkspaceMismatch { .. } => "WORKSPACE_MISMATCH",
            Self::Blank { .. } => "BLANK",
            Self::TooLong { .. } => "TOO_LONG",
            Self::DuplicateName { .. } => "DUPLICATE_NAME",
            Self::InvalidColor(_) => "INVALID_COLOR",
            Self::AmountNotPositive { .. } => "AMOUNT_NOT_POSITIVE",
            Self::AmountPrecision { .. } => "AMOUNT_PRECISION",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::DateTooFarInFuture { .. } => "DATE_TOO_FAR_IN_FUTURE",
            Self::DayOutOfRange { .. } => "DAY_OUT_OF_RANGE",
            Self::UnknownProfile { .. } => "UNKNOWN_PROFILE",
            Self::UnknownTag(_) => "UNKNOWN_TAG",
            Self::UnknownCard(_) => "UNKNOWN_CARD",
            Self::UnknownExpense(_) => "UNKNOWN_EXPENSE",
            Self::ProfileAlreadyLinked(_) => "PROFILE_ALREADY_LINKED",
            Self::NoShares => "NO_SHARES",
            Self::ShareOutOfRange { .. } => "SHARE_OUT_OF_RANGE",
            Self::DuplicateShare(_) => "DUPLICATE_SHARE",
            Self::SharesDoNotSumToHundred { .. } => "SHARES_DO_NOT_SUM_TO_HUNDRED",
            Self::ExpenseAlreadyCovered { .. } => "EXPENSE_ALREADY_COVERED",
            Self::SelfSettlement => "SELF_SETTLEMENT",
            Self::ExceedsOutstandingBalance { .. } => "EXCEEDS_OUTSTANDING_BALANCE",
            Self::StillReferenced { .. } => "STILL_REFERENCED",
        }
    }
}
