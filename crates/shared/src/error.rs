//! Application-wide error types.
//!
//! Every failure that crosses the workspace boundary is one of these kinds.
//! Only [`AppError::Unavailable`] is ever retried automatically.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// No authenticated identity is bound to the session.
    #[error("Not signed in: {0}")]
    Unauthorized(String),

    /// Share code or entity could not be resolved.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Access check failed.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Entity failed validation; one message per violated rule.
    #[error("Validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// Membership creation was rejected (e.g. workspace at capacity).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The remote store could not be reached or timed out.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl AppError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Invalid(_) => "INVALID",
            Self::Conflict(_) => "CONFLICT",
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }

    /// Returns true if the caller may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Returns the individual violation messages of an `Invalid` error.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Invalid(errors) => errors,
            _ => &[],
        }
    }
}
