//! In-memory store implementations.
//!
//! Used by the server when it runs from seed files, and by tests across the
//! workspace.

use crate::error::StoreError;
use crate::identity::Identity;
use crate::store::{IdentityStore, UserStore};
use crate::user::User;
use async_trait::async_trait;
use gatehouse_core::{IdentityId, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Identity store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    identities: RwLock<HashMap<IdentityId, Identity>>,
}

impl MemoryIdentityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with identities.
    #[must_use]
    pub fn with_identities(identities: impl IntoIterator<Item = Identity>) -> Self {
        let identities = identities
            .into_iter()
            .map(|identity| (identity.id(), identity))
            .collect();
        Self {
            identities: RwLock::new(identities),
        }
    }

    /// Inserts or replaces an identity.
    pub async fn insert(&self, identity: Identity) {
        self.identities.write().await.insert(identity.id(), identity);
    }

    /// Returns the number of stored identities.
    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    /// Returns true if the store holds no identities.
    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn load_by_id(&self, id: IdentityId) -> Result<Identity, StoreError> {
        let identities = self.identities.read().await;
        identities
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("identity", id.to_string()).into())
    }

    async fn load_by_activitypub_actor(&self, actor: &str) -> Result<Identity, StoreError> {
        let identities = self.identities.read().await;
        let found = identities
            .values()
            .find(|identity| identity.activitypub_actor() == Some(actor))
            .cloned();

        debug!(actor, found = found.is_some(), "identity lookup by actor");
        found.ok_or_else(|| StoreError::not_found("identity", actor).into())
    }
}

/// User store backed by a map keyed on lowercased email.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with users.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.email().to_lowercase(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Inserts or replaces a user.
    pub async fn insert(&self, user: User) {
        self.users
            .write()
            .await
            .insert(user.email().to_lowercase(), user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn load_by_email(&self, email: &str) -> Result<User, StoreError> {
        let users = self.users.read().await;
        users
            .get(&email.to_lowercase())
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", email).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::PrivilegeId;

    #[tokio::test]
    async fn identity_lookup_by_id() {
        let privilege = PrivilegeId::new();
        let identity = Identity::new().with_privileges([privilege]);
        let id = identity.id();
        let store = MemoryIdentityStore::with_identities([identity]);

        let loaded = store.load_by_id(id).await.expect("identity exists");
        assert_eq!(loaded.privilege_ids(), &[privilege]);
        assert!(store.load_by_id(IdentityId::new()).await.is_err());
    }

    #[tokio::test]
    async fn identity_lookup_by_actor() {
        let store = MemoryIdentityStore::new();
        store
            .insert(Identity::new().with_activitypub_actor("https://remote.example/users/ada"))
            .await;
        assert_eq!(store.len().await, 1);

        assert!(
            store
                .load_by_activitypub_actor("https://remote.example/users/ada")
                .await
                .is_ok()
        );
        assert!(
            store
                .load_by_activitypub_actor("https://remote.example/users/bob")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn user_lookup_ignores_email_case() {
        let user = User::new("Ada@Example.com");
        let id = user.id();
        let store = MemoryUserStore::with_users([user]);

        let loaded = store
            .load_by_email("ada@example.COM")
            .await
            .expect("user exists");
        assert_eq!(loaded.id(), id);
        assert!(store.load_by_email("bob@example.com").await.is_err());
    }
}
