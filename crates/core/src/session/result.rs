//! Outcome of share-code operations.

use casal_shared::AppError;
use casal_shared::types::{CoupleId, ProfileId};
use serde::Serialize;

use crate::access::ShareCode;

/// Result of validating a share code, joining or creating a workspace.
///
/// On success `error` is absent and `couple_id` is set; on failure `error`
/// carries a non-empty message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    couple_id: Option<CoupleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_id: Option<ProfileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_code: Option<ShareCode>,
    #[serde(skip)]
    error_code: Option<&'static str>,
}

impl ValidationResult {
    /// A successful outcome.
    #[must_use]
    pub const fn ok(couple_id: CoupleId, profile_id: Option<ProfileId>) -> Self {
        Self {
            success: true,
            error: None,
            couple_id: Some(couple_id),
            profile_id,
            share_code: None,
            error_code: None,
        }
    }

    /// Attaches the share code of a newly created workspace.
    #[must_use]
    pub fn with_share_code(mut self, share_code: ShareCode) -> Self {
        if self.success {
            self.share_code = Some(share_code);
        }
        self
    }

    /// A failed outcome describing `err`.
    #[must_use]
    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            couple_id: None,
            profile_id: None,
            share_code: None,
            error_code: Some(err.error_code()),
        }
    }

    /// True on success.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Failure message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Stable code of the failure, e.g. `NOT_FOUND`.
    #[must_use]
    pub const fn error_code(&self) -> Option<&'static str> {
        self.error_code
    }

    /// Resolved workspace.
    #[must_use]
    pub const fn couple_id(&self) -> Option<CoupleId> {
        self.couple_id
    }

    /// The member's profile, when a membership was involved.
    #[must_use]
    pub const fn profile_id(&self) -> Option<ProfileId> {
        self.profile_id
    }

    /// Code for the partner to join, set only by workspace creation.
    #[must_use]
    pub const fn share_code(&self) -> Option<&ShareCode> {
        self.share_code.as_ref()
    }
}

impl From<Result<(CoupleId, Option<ProfileId>), AppError>> for ValidationResult {
    fn from(outcome: Result<(CoupleId, Option<ProfileId>), AppError>) -> Self {
        match outcome {
            Ok((couple_id, profile_id)) => Self::ok(couple_id, profile_id),
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_serializes_camel_case() {
        let couple_id = CoupleId::new();
        let profile_id = ProfileId::new();
        let json = serde_json::to_value(ValidationResult::ok(couple_id, Some(profile_id))).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["coupleId"], couple_id.to_string());
        assert_eq!(json["profileId"], profile_id.to_string());
        assert!(json.get("error").is_none());
        assert!(json.get("shareCode").is_none());
    }

    #[test]
    fn test_share_code_only_on_success() {
        let code = ShareCode::parse("ABC123", &crate::access::ShareCodeRules::default()).unwrap();
        let ok = ValidationResult::ok(CoupleId::new(), None).with_share_code(code.clone());
        assert_eq!(ok.share_code(), Some(&code));

        let failed = ValidationResult::failure(&AppError::Unavailable("down".into()))
            .with_share_code(code);
        assert_eq!(failed.share_code(), None);
    }

    #[test]
    fn test_failure_has_message_and_code() {
        let result = ValidationResult::failure(&AppError::NotFound("share code".into()));
        assert!(!result.success());
        assert_eq!(result.error(), Some("Not found: share code"));
        assert_eq!(result.error_code(), Some("NOT_FOUND"));
        assert_eq!(result.couple_id(), None);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("coupleId").is_none());
        assert!(json.get("errorCode").is_none());
    }
}
