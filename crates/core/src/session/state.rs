//! Identity and session phase types.

use casal_shared::types::{CoupleId, UserId};
use serde::{Deserialize, Serialize};

/// An authenticated identity, as supplied by the external auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user ID.
    pub user_id: UserId,
    /// Contact address, if the provider shares one.
    #[serde(default)]
    pub email: Option<String>,
    /// Provider metadata, opaque to the core.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Identity {
    /// Identity with no email or metadata.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Where the session stands in the sign-in / share-code flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "coupleId", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nobody signed in.
    Unauthenticated,
    /// Signed in, no workspace bound.
    Unvalidated,
    /// Signed in and bound to a workspace.
    Validated(CoupleId),
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Signed-in identity.
    pub identity: Option<Identity>,
    /// Whether a share code has been validated.
    pub is_validated: bool,
    /// Workspace the session is bound to.
    pub couple_id: Option<CoupleId>,
}

#[derive(Debug, Default)]
pub(super) struct SessionState {
    pub identity: Option<Identity>,
    pub couple_id: Option<CoupleId>,
    // Bumped whenever an in-flight validation must no longer bind.
    pub epoch: u64,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match (&self.identity, self.couple_id) {
            (None, _) => SessionPhase::Unauthenticated,
            (Some(_), None) => SessionPhase::Unvalidated,
            (Some(_), Some(couple_id)) => SessionPhase::Validated(couple_id),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            identity: self.identity.clone(),
            is_validated: self.couple_id.is_some(),
            couple_id: self.couple_id,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|identity| identity.user_id)
    }

    pub fn reset_binding(&mut self) {
        self.couple_id = None;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
