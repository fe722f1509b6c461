//! Test doubles shared by the unit tests in this crate.

use async_trait::async_trait;
use gatehouse_core::{IdentityId, Result};
use gatehouse_identity::{Identity, IdentityStore, StoreError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Identity store that counts lookups and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct CountingIdentityStore {
    identity: Option<Identity>,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingIdentityStore {
    pub(crate) fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, matches: impl Fn(&Identity) -> bool, key: String) -> Result<Identity, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Unavailable {
                details: "identity store offline".to_string(),
            }
            .into());
        }
        self.identity
            .clone()
            .filter(|identity| matches(identity))
            .ok_or_else(|| StoreError::not_found("identity", key).into())
    }
}

#[async_trait]
impl IdentityStore for CountingIdentityStore {
    async fn load_by_id(&self, id: IdentityId) -> Result<Identity, StoreError> {
        self.lookup(|identity| identity.id() == id, id.to_string())
    }

    async fn load_by_activitypub_actor(&self, actor: &str) -> Result<Identity, StoreError> {
        self.lookup(
            |identity| identity.activitypub_actor() == Some(actor),
            actor.to_string(),
        )
    }
}
