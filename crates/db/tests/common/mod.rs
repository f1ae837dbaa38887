//! Shared fixtures: clients talking to one in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use casal_core::access::AccessResolver;
use casal_core::remote::RemoteStore;
use casal_core::session::{Identity, Session};
use casal_core::workspace::{WorkspaceStore, WorkspaceSync};
use casal_db::MemoryStore;
use casal_shared::AppConfig;
use casal_shared::telemetry::init_tracing;
use casal_shared::types::{CoupleId, ProfileId, UserId};

/// Config with short timeouts and near-zero backoff.
pub fn fast_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.remote.timeout_ms = 500;
    config.remote.max_attempts = 3;
    config.remote.retry_backoff_ms = 1;
    config
}

pub fn store(config: &AppConfig) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(config))
}

/// One app instance: its own session and membership cache.
pub struct Client {
    pub user_id: UserId,
    pub session: Session,
    pub sync: WorkspaceSync,
}

impl Client {
    pub async fn signed_in(store: &Arc<MemoryStore>, config: &AppConfig) -> Self {
        // Only the first test in the binary installs it.
        let _ = init_tracing(&config.telemetry);

        let remote: Arc<dyn RemoteStore> = store.clone();
        let access = Arc::new(AccessResolver::new(remote, config));
        let session = Session::new(Arc::clone(&access));
        let user_id = UserId::new();
        session
            .sign_in(Identity::new(user_id))
            .await
            .expect("sign in");
        Self {
            user_id,
            session,
            sync: WorkspaceSync::new(access, config),
        }
    }

    pub async fn open(&self, couple_id: CoupleId) -> WorkspaceStore {
        self.sync
            .open(&self.session, couple_id)
            .await
            .expect("open workspace")
    }
}

/// Owner who created a workspace and a partner who joined it.
pub struct Couple {
    pub couple_id: CoupleId,
    pub share_code: String,
    pub owner: Client,
    pub owner_profile: ProfileId,
    pub partner: Client,
    pub partner_profile: ProfileId,
}

pub async fn couple(store: &Arc<MemoryStore>, config: &AppConfig) -> Couple {
    let owner = Client::signed_in(store, config).await;
    let created = owner.session.create_space().await;
    assert!(created.success(), "create_space: {:?}", created.error());
    let couple_id = created.couple_id().expect("couple id");
    let share_code = created.share_code().expect("share code").to_string();

    let partner = Client::signed_in(store, config).await;
    let joined = partner.session.join_space(&share_code).await;
    assert!(joined.success(), "join_space: {:?}", joined.error());

    Couple {
        couple_id,
        share_code,
        owner_profile: created.profile_id().expect("owner profile"),
        owner,
        partner_profile: joined.profile_id().expect("partner profile"),
        partner,
    }
}
