//! Share code normalization.

use std::fmt;

use casal_shared::config::AccessConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length bounds applied after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareCodeRules {
    /// Shortest accepted code.
    pub min_len: usize,
    /// Longest accepted code.
    pub max_len: usize,
}

impl Default for ShareCodeRules {
    fn default() -> Self {
        Self::from(&AccessConfig::default())
    }
}

impl From<&AccessConfig> for ShareCodeRules {
    fn from(config: &AccessConfig) -> Self {
        Self {
            min_len: config.share_code_min_len,
            max_len: config.share_code_max_len,
        }
    }
}

/// Reasons a typed code cannot be a share code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareCodeError {
    /// Nothing left after normalization.
    #[error("share code is empty")]
    Empty,

    /// Shorter than allowed.
    #[error("share code must have at least {min} characters")]
    TooShort {
        /// Minimum length.
        min: usize,
    },

    /// Longer than allowed.
    #[error("share code must have at most {max} characters")]
    TooLong {
        /// Maximum length.
        max: usize,
    },

    /// Contains something other than letters and digits.
    #[error("share code contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A normalized share code: ASCII letters and digits, upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareCode(String);

impl ShareCode {
    /// Normalizes user input: trims, drops inner spaces and dashes, upper-cases.
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        raw.trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Parses user input into a share code.
    ///
    /// # Errors
    ///
    /// Returns an error if the normalized code is empty, out of bounds or
    /// contains anything but ASCII letters and digits.
    pub fn parse(raw: &str, rules: &ShareCodeRules) -> Result<Self, ShareCodeError> {
        let code = Self::normalize(raw);

        if code.is_empty() {
            return Err(ShareCodeError::Empty);
        }
        if let Some(bad) = code.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(ShareCodeError::InvalidCharacter(bad));
        }

        let len = code.len();
        if len < rules.min_len {
            return Err(ShareCodeError::TooShort { min: rules.min_len });
        }
        if len > rules.max_len {
            return Err(ShareCodeError::TooLong { max: rules.max_len });
        }

        Ok(Self(code))
    }

    /// Returns the normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
