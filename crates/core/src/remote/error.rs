//! Remote store error types.

use casal_shared::AppError;
use thiserror::Error;

/// Failures reported by a [`super::RemoteStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Store unreachable, overloaded or timed out. Always retriable.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// Store refused the request (e.g. membership at capacity).
    #[error("rejected by remote store: {0}")]
    Rejected(String),

    /// Actor is not allowed to perform the request.
    #[error("remote store denied access: {0}")]
    Forbidden(String),

    /// Referenced workspace or entity does not exist.
    #[error("not found in remote store: {0}")]
    NotFound(String),
}

impl RemoteError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a rejected error.
    #[must_use]
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Returns true if the same call may succeed when retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unavailable(msg) => Self::Unavailable(msg),
            RemoteError::Rejected(msg) => Self::Conflict(msg),
            RemoteError::Forbidden(msg) => Self::Forbidden(msg),
            RemoteError::NotFound(msg) => Self::NotFound(msg),
        }
    }
}
