//! The per-request authorization context.
//!
//! An `Authorization` is built once per request, either from the session
//! cookie of a browser user or from a verified HTTP signature, and is never
//! mutated afterwards.

use gatehouse_core::{GroupId, IdentityId, UserId};
use serde::{Deserialize, Serialize};

/// Claims about the principal making the current request.
///
/// The default value is the anonymous visitor: no user, no groups, no
/// identity, not a domain owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// The signed-in local user, if any.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Unconditional superuser flag for the owner of the domain.
    #[serde(default)]
    pub domain_owner: bool,
    /// Groups the signed-in user belongs to.
    #[serde(default)]
    pub group_ids: Vec<GroupId>,
    /// A cryptographically verified identity, if any.
    #[serde(default)]
    pub identity_id: Option<IdentityId>,
}

impl Authorization {
    /// Returns the anonymous authorization.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates an authorization for a signed-in local user.
    #[must_use]
    pub fn for_user(user_id: UserId, group_ids: Vec<GroupId>) -> Self {
        Self {
            user_id: Some(user_id),
            group_ids,
            ..Self::default()
        }
    }

    /// Creates an authorization for a verified identity with no local account.
    #[must_use]
    pub fn for_identity(identity_id: IdentityId) -> Self {
        Self {
            identity_id: Some(identity_id),
            ..Self::default()
        }
    }

    /// Marks this authorization as belonging to the domain owner.
    #[must_use]
    pub fn with_domain_owner(mut self, domain_owner: bool) -> Self {
        self.domain_owner = domain_owner;
        self
    }

    /// Attaches a verified identity.
    #[must_use]
    pub fn with_identity(mut self, identity_id: IdentityId) -> Self {
        self.identity_id = Some(identity_id);
        self
    }

    /// Returns true if a local user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Returns true if a verified identity is attached.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.identity_id.is_some()
    }

    /// Returns true if the user belongs to any of the given groups.
    #[must_use]
    pub fn is_group_member(&self, group_ids: &[GroupId]) -> bool {
        group_ids.iter().any(|id| self.group_ids.contains(id))
    }
}
