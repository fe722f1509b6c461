//! Verified identities and the privileges they accumulate.
//!
//! An identity exists independently of any local account. It is created the
//! first time a remote actor is verified or a purchase grants a privilege,
//! gains privileges over time, and is retired rather than deleted.

use chrono::{DateTime, Utc};
use gatehouse_core::{IdentityId, PrivilegeId};
use serde::{Deserialize, Serialize};

/// A verified principal, addressable by email or by an ActivityPub actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Internal identity ID.
    id: IdentityId,
    /// Verified email address, if the identity proved ownership of one.
    #[serde(default)]
    email: Option<String>,
    /// ActivityPub actor URL used to match signed requests.
    #[serde(default)]
    activitypub_actor: Option<String>,
    /// Privileges granted to this identity.
    #[serde(default)]
    privilege_ids: Vec<PrivilegeId>,
    /// When the identity was retired, if it has been.
    #[serde(default)]
    retired_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Creates a new identity with a generated ID and no privileges.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(IdentityId::new())
    }

    /// Creates an identity with a known ID.
    #[must_use]
    pub fn with_id(id: IdentityId) -> Self {
        Self {
            id,
            email: None,
            activitypub_actor: None,
            privilege_ids: Vec::new(),
            retired_at: None,
        }
    }

    /// Sets the verified email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the ActivityPub actor URL.
    #[must_use]
    pub fn with_activitypub_actor(mut self, actor: impl Into<String>) -> Self {
        self.activitypub_actor = Some(actor.into());
        self
    }

    /// Adds privileges to the identity.
    #[must_use]
    pub fn with_privileges(mut self, privileges: impl IntoIterator<Item = PrivilegeId>) -> Self {
        for privilege in privileges {
            self.grant_privilege(privilege);
        }
        self
    }

    /// Returns the identity ID.
    #[must_use]
    pub fn id(&self) -> IdentityId {
        self.id
    }

    /// Returns the verified email address, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the ActivityPub actor URL, if any.
    #[must_use]
    pub fn activitypub_actor(&self) -> Option<&str> {
        self.activitypub_actor.as_deref()
    }

    /// Returns the privileges this identity currently holds.
    ///
    /// A retired identity holds none.
    #[must_use]
    pub fn privilege_ids(&self) -> &[PrivilegeId] {
        if self.is_retired() {
            return &[];
        }
        &self.privilege_ids
    }

    /// Returns true if the identity holds any of the given privileges.
    #[must_use]
    pub fn has_any_privilege(&self, required: &[PrivilegeId]) -> bool {
        self.privilege_ids()
            .iter()
            .any(|privilege| required.contains(privilege))
    }

    /// Grants a privilege. Granting one that is already held is a no-op.
    pub fn grant_privilege(&mut self, privilege: PrivilegeId) {
        if !self.privilege_ids.contains(&privilege) {
            self.privilege_ids.push(privilege);
        }
    }

    /// Returns when the identity was retired, if it has been.
    #[must_use]
    pub fn retired_at(&self) -> Option<DateTime<Utc>> {
        self.retired_at
    }

    /// Returns true if the identity has been retired.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired_at.is_some()
    }

    /// Retires the identity. Its record is kept but it no longer grants access.
    pub fn retire(&mut self) {
        if self.retired_at.is_none() {
            self.retired_at = Some(Utc::now());
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}
