//! Remote revision numbers.

use serde::{Deserialize, Serialize};

/// Monotonically increasing revision assigned by the remote store.
///
/// Ordering between two writes to the same entity is decided solely by this
/// value; the client never invents one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Revision(pub u64);

impl Revision {
    /// The revision preceding every stored write.
    pub const ZERO: Self = Self(0);

    /// Returns the next revision.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the raw revision number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_ordering() {
        assert!(Revision(2) > Revision(1));
        assert_eq!(Revision::ZERO.next(), Revision(1));
        assert_eq!(Revision(u64::MAX).next(), Revision(u64::MAX));
        assert_eq!(Revision(7).to_string(), "r7");
    }
}
