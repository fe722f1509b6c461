//! Store contracts consumed by the authorization engine.
//!
//! Persistence lives outside gatehouse. Implementations of these traits are
//! treated as read-mostly and externally synchronized; the engine applies no
//! timeout or retry of its own.

use crate::error::StoreError;
use crate::identity::Identity;
use crate::user::User;
use async_trait::async_trait;
use gatehouse_core::{IdentityId, Result};

/// Resolves verified identities.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Loads an identity by its internal ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no identity has this ID, or
    /// `StoreError::Unavailable` if the store cannot be reached.
    async fn load_by_id(&self, id: IdentityId) -> Result<Identity, StoreError>;

    /// Loads the identity bound to an ActivityPub actor URL.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no identity is bound to the actor.
    async fn load_by_activitypub_actor(&self, actor: &str) -> Result<Identity, StoreError>;
}

/// Resolves local user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Loads a user by email address.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no user has this address.
    async fn load_by_email(&self, email: &str) -> Result<User, StoreError>;
}
