//! Session and share-code binding.
//!
//! A [`Session`] holds the signed-in identity and, once a share code has
//! been validated, the workspace it is bound to. Remote work always happens
//! before the state lock is taken; the binding is then written in a single
//! step, and only if nothing reset the session in the meantime. Dropping a
//! pending operation therefore leaves the session exactly as it was.

mod result;
mod state;

use std::sync::Arc;

use casal_shared::AppError;
use casal_shared::types::{CoupleId, ProfileId, UserId};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::access::AccessResolver;

pub use result::ValidationResult;
pub use state::{Identity, SessionPhase, SessionSnapshot};

use state::SessionState;

/// Per-client session, passed explicitly to whatever needs it.
pub struct Session {
    access: Arc<AccessResolver>,
    state: RwLock<SessionState>,
}

impl Session {
    /// Creates a signed-out session.
    #[must_use]
    pub fn new(access: Arc<AccessResolver>) -> Self {
        Self {
            access,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// The access resolver backing this session.
    #[must_use]
    pub const fn access(&self) -> &Arc<AccessResolver> {
        &self.access
    }

    /// Signs `identity` in and loads its memberships.
    ///
    /// Signing in as a different identity clears any binding; signing in
    /// again as the same one keeps it.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if memberships cannot be loaded; the session is
    /// left unchanged.
    pub async fn sign_in(&self, identity: Identity) -> Result<(), AppError> {
        let user_id = identity.user_id;
        self.access.load_memberships(user_id).await?;

        let mut state = self.state.write();
        if state.user_id() != Some(user_id) {
            if let Some(previous) = state.user_id() {
                self.access.forget(previous);
            }
            state.reset_binding();
        }
        state.identity = Some(identity);
        info!(%user_id, "signed in");
        Ok(())
    }

    /// Signs out, dropping the binding and cached memberships.
    pub fn sign_out(&self) {
        let mut state = self.state.write();
        if let Some(user_id) = state.user_id() {
            self.access.forget(user_id);
            info!(%user_id, "signed out");
        }
        state.identity = None;
        state.reset_binding();
    }

    /// The signed-in identity.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.state.read().identity.clone()
    }

    /// ID of the signed-in identity.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.state.read().user_id()
    }

    /// Workspace the session is bound to.
    #[must_use]
    pub fn couple_id(&self) -> Option<CoupleId> {
        self.state.read().couple_id
    }

    /// True once a share code has been validated.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.state.read().couple_id.is_some()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.read().phase()
    }

    /// Consistent copy of the whole state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().snapshot()
    }

    /// Resolves `code` and binds the session to its workspace.
    ///
    /// Does not create a membership.
    pub async fn validate_share_code(&self, code: &str) -> ValidationResult {
        let outcome = async {
            let (user_id, epoch) = self.begin()?;
            let couple_id = self.access.resolve(code).await?;
            self.bind(user_id, epoch, couple_id)?;
            let profile_id = self
                .access
                .membership(user_id, couple_id)
                .map(|m| m.profile_id);
            Ok::<_, AppError>((couple_id, profile_id))
        }
        .await;

        Self::report("validate_share_code", outcome)
    }

    /// Resolves `code`, joins its workspace and binds the session to it.
    ///
    /// Joining a workspace the identity already belongs to succeeds and
    /// returns the existing profile.
    pub async fn join_space(&self, code: &str) -> ValidationResult {
        let outcome = async {
            let (user_id, epoch) = self.begin()?;
            let couple_id = self.access.resolve(code).await?;
            let receipt = self.access.join(user_id, couple_id).await?;
            self.bind(user_id, epoch, couple_id)?;
            Ok::<_, AppError>((couple_id, Some(receipt.membership.profile_id)))
        }
        .await;

        Self::report("join_space", outcome)
    }

    /// Creates a workspace owned by the signed-in identity and binds to it.
    ///
    /// The result carries the share code for the partner.
    pub async fn create_space(&self) -> ValidationResult {
        let outcome = async {
            let (user_id, epoch) = self.begin()?;
            let created = self.access.create_workspace(user_id).await?;
            let membership = created.membership;
            self.bind(user_id, epoch, membership.couple_id)?;
            Ok::<_, AppError>((membership, created.share_code))
        }
        .await;

        match outcome {
            Ok((membership, share_code)) => Self::report(
                "create_space",
                Ok((membership.couple_id, Some(membership.profile_id))),
            )
            .with_share_code(share_code),
            Err(err) => Self::report("create_space", Err(err)),
        }
    }

    /// True iff signed in and a member of `couple_id`.
    #[must_use]
    pub fn has_access_to_couple(&self, couple_id: CoupleId) -> bool {
        self.user_id()
            .is_some_and(|user_id| self.access.has_access(user_id, couple_id))
    }

    /// True iff bound to `couple_id` and a member of it.
    #[must_use]
    pub fn may_act_on(&self, couple_id: CoupleId) -> bool {
        let state = self.state.read();
        match (state.user_id(), state.couple_id) {
            (Some(user_id), Some(bound)) => {
                bound == couple_id && self.access.has_access(user_id, couple_id)
            }
            _ => false,
        }
    }

    /// Unbinds the workspace. Memberships are untouched.
    pub fn clear_validation(&self) {
        let mut state = self.state.write();
        if let Some(couple_id) = state.couple_id {
            info!(%couple_id, "validation cleared");
        }
        state.reset_binding();
    }

    fn begin(&self) -> Result<(UserId, u64), AppError> {
        let state = self.state.read();
        let user_id = state
            .user_id()
            .ok_or_else(|| AppError::Unauthorized("sign in first".into()))?;
        Ok((user_id, state.epoch))
    }

    fn bind(&self, user_id: UserId, epoch: u64, couple_id: CoupleId) -> Result<(), AppError> {
        let mut state = self.state.write();
        if state.epoch != epoch || state.user_id() != Some(user_id) {
            return Err(AppError::Conflict(
                "session changed while the request was in flight".into(),
            ));
        }
        state.couple_id = Some(couple_id);
        Ok(())
    }

    fn report(
        operation: &'static str,
        outcome: Result<(CoupleId, Option<ProfileId>), AppError>,
    ) -> ValidationResult {
        match &outcome {
            Ok((couple_id, _)) => info!(operation, %couple_id, "workspace bound"),
            Err(err) => {
                warn!(operation, code = err.error_code(), error = %err, "share code rejected");
            }
        }
        ValidationResult::from(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::CallPolicy;
    use crate::remote::{Membership, MembershipReceipt, MockRemoteStore};
    use casal_shared::config::AccessConfig;
    use std::time::Duration;

    fn session(mock: MockRemoteStore) -> Session {
        let policy = CallPolicy {
            timeout: Duration::from_millis(100),
            max_attempts: 1,
            backoff: Duration::from_millis(1),
        };
        let access = AccessResolver::with_policy(Arc::new(mock), &AccessConfig::default(), policy);
        Session::new(Arc::new(access))
    }

    #[tokio::test]
    async fn test_phases() {
        let couple = CoupleId::new();
        let mut mock = MockRemoteStore::new();
        mock.expect_memberships_for().returning(|_| Ok(vec![]));
        mock.expect_lookup_workspace_by_share_code()
            .returning(move |_| Ok(Some(couple)));

        let session = session(mock);
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);

        session.sign_in(Identity::new(UserId::new())).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Unvalidated);

        let result = session.validate_share_code("ABC123").await;
        assert!(result.success());
        assert_eq!(session.phase(), SessionPhase::Validated(couple));

        session.sign_out();
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!session.is_validated());
    }

    #[tokio::test]
    async fn test_validation_without_identity_is_unauthorized() {
        let mut mock = MockRemoteStore::new();
        mock.expect_lookup_workspace_by_share_code().never();

        let result = session(mock).validate_share_code("ABC123").await;
        assert!(!result.success());
        assert_eq!(result.error_code(), Some("UNAUTHORIZED"));
    }

    #[tokio::test]
    async fn test_validation_does_not_grant_access() {
        let couple = CoupleId::new();
        let mut mock = MockRemoteStore::new();
        mock.expect_memberships_for().returning(|_| Ok(vec![]));
        mock.expect_lookup_workspace_by_share_code()
            .returning(move |_| Ok(Some(couple)));

        let session = session(mock);
        session.sign_in(Identity::new(UserId::new())).await.unwrap();
        assert!(session.validate_share_code("ABC123").await.success());

        assert!(session.is_validated());
        assert!(!session.has_access_to_couple(couple));
        assert!(!session.may_act_on(couple));
    }

    #[tokio::test]
    async fn test_join_binds_and_grants_access() {
        let user = UserId::new();
        let couple = CoupleId::new();
        let profile_id = ProfileId::new();
        let mut mock = MockRemoteStore::new();
        mock.expect_memberships_for().returning(|_| Ok(vec![]));
        mock.expect_lookup_workspace_by_share_code()
            .returning(move |_| Ok(Some(couple)));
        mock.expect_fetch_members().returning(|_| Ok(vec![]));
        mock.expect_create_or_confirm_membership()
            .returning(move |user_id, couple_id, _| {
                Ok(MembershipReceipt {
                    membership: Membership {
                        user_id,
                        couple_id,
                        profile_id,
                    },
                    created: true,
                })
            });

        let session = session(mock);
        session.sign_in(Identity::new(user)).await.unwrap();
        let result = session.join_space("abc-123").await;

        assert!(result.success());
        assert_eq!(result.couple_id(), Some(couple));
        assert_eq!(result.profile_id(), Some(profile_id));
        assert!(session.may_act_on(couple));
        assert!(!session.may_act_on(CoupleId::new()));
    }

    #[tokio::test]
    async fn test_failed_validation_keeps_binding() {
        let couple = CoupleId::new();
        let mut mock = MockRemoteStore::new();
        mock.expect_memberships_for().returning(|_| Ok(vec![]));
        mock.expect_lookup_workspace_by_share_code()
            .withf(|code| code.as_str() == "ABC123")
            .returning(move |_| Ok(Some(couple)));
        mock.expect_lookup_workspace_by_share_code()
            .returning(|_| Ok(None));

        let session = session(mock);
        session.sign_in(Identity::new(UserId::new())).await.unwrap();
        assert!(session.validate_share_code("ABC123").await.success());

        let result = session.validate_share_code("ZZZZZZ").await;
        assert!(!result.success());
        assert_eq!(result.couple_id(), None);
        assert_eq!(session.couple_id(), Some(couple));
    }

    #[tokio::test]
    async fn test_clear_validation_is_idempotent() {
        let couple = CoupleId::new();
        let mut mock = MockRemoteStore::new();
        mock.expect_memberships_for().returning(|_| Ok(vec![]));
        mock.expect_lookup_workspace_by_share_code()
            .returning(move |_| Ok(Some(couple)));

        let session = session(mock);
        let identity = Identity::new(UserId::new()).with_email("ana@example.com");
        session.sign_in(identity.clone()).await.unwrap();
        session.validate_share_code("ABC123").await;

        session.clear_validation();
        let once = session.snapshot();
        session.clear_validation();
        assert_eq!(session.snapshot(), once);
        assert_eq!(once.identity, Some(identity));
        assert!(!once.is_validated);
        assert_eq!(once.couple_id, None);
    }

    #[tokio::test]
    async fn test_stale_epoch_does_not_bind() {
        let user = UserId::new();
        let mut mock = MockRemoteStore::new();
        mock.expect_memberships_for().returning(|_| Ok(vec![]));

        let session = session(mock);
        session.sign_in(Identity::new(user)).await.unwrap();
        let (user_id, epoch) = session.begin().unwrap();
        session.clear_validation();

        let err = session.bind(user_id, epoch, CoupleId::new()).unwrap_err();
        assert_eq!(err.error_code(), "CONFLICT");
        assert!(!session.is_validated());
    }

    #[tokio::test]
    async fn test_switching_identity_clears_binding() {
        let couple = CoupleId::new();
        let mut mock = MockRemoteStore::new();
        mock.expect_memberships_for().returning(|_| Ok(vec![]));
        mock.expect_lookup_workspace_by_share_code()
            .returning(move |_| Ok(Some(couple)));

        let session = session(mock);
        let ana = Identity::new(UserId::new());
        session.sign_in(ana.clone()).await.unwrap();
        session.validate_share_code("ABC123").await;

        session.sign_in(ana).await.unwrap();
        assert_eq!(session.couple_id(), Some(couple));

        session.sign_in(Identity::new(UserId::new())).await.unwrap();
        assert_eq!(session.couple_id(), None);
    }
}
