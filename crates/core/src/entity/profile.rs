//! Profile configuration status.

use serde::{Deserialize, Serialize};

use super::types::Profile;

/// Names given to profiles created on the member's behalf.
///
/// A profile keeps one of these until its owner picks a real name.
pub const PLACEHOLDER_NAMES: [&str; 3] = ["Pessoa 1", "Pessoa 2", "Pessoa"];

/// Whether a profile has been named by its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    /// Still carries a placeholder name.
    Unconfigured,
    /// Named by its owner.
    Configured,
}

impl Profile {
    /// Placeholder name for the profile created in the given member slot.
    ///
    /// Slot 0 is the workspace creator, slot 1 the partner who joined;
    /// any further member gets the generic name.
    #[must_use]
    pub const fn placeholder_name(slot: usize) -> &'static str {
        match slot {
            0 => PLACEHOLDER_NAMES[0],
            1 => PLACEHOLDER_NAMES[1],
            _ => PLACEHOLDER_NAMES[2],
        }
    }

    /// Returns true while the name is exactly one of [`PLACEHOLDER_NAMES`].
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        PLACEHOLDER_NAMES.contains(&self.name.as_str())
    }

    /// Classifies the profile by its name.
    ///
    /// A blank name is not a status but a validation failure; see
    /// [`crate::validation::classify_profile_name`].
    #[must_use]
    pub fn status(&self) -> ProfileStatus {
        if self.is_placeholder() {
            ProfileStatus::Unconfigured
        } else {
            ProfileStatus::Configured
        }
    }
}
