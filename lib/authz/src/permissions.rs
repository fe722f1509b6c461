//! Capability sets used to scope queries.
//!
//! A capability set lists everything a principal is entitled to see. The
//! domain owner is the exception: its set is `Unrestricted`, which query
//! builders must read as "apply no filter" rather than as a list.

use gatehouse_core::{GroupId, PrivilegeId, UserId};
use gatehouse_identity::{Authorization, Identity};
use serde::{Deserialize, Serialize};

/// One entry in a capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Grant {
    /// Content visible to everyone.
    Anonymous,
    /// Content visible to any signed-in user.
    Authenticated,
    /// Content visible to one user.
    User(UserId),
    /// Content visible to members of a group.
    Group(GroupId),
    /// Content visible to holders of a privilege.
    Privilege(PrivilegeId),
}

/// Everything a principal may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "grants", rename_all = "snake_case")]
pub enum Permissions {
    /// No filtering applies.
    Unrestricted,
    /// Only records matching one of these grants.
    Enumerated(Vec<Grant>),
}

impl Permissions {
    /// Returns the set every visitor holds.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::Enumerated(vec![Grant::Anonymous])
    }

    /// Returns the set that bypasses all filtering.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::Unrestricted
    }

    /// Returns true if no filtering applies.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Returns the enumerated grants, or `None` for the unrestricted set.
    #[must_use]
    pub fn grants(&self) -> Option<&[Grant]> {
        match self {
            Self::Unrestricted => None,
            Self::Enumerated(grants) => Some(grants),
        }
    }

    /// Adds a grant. Duplicates and additions to the unrestricted set are no-ops.
    pub fn push(&mut self, grant: Grant) {
        if let Self::Enumerated(grants) = self {
            if !grants.contains(&grant) {
                grants.push(grant);
            }
        }
    }

    /// Returns true if the set includes the grant.
    #[must_use]
    pub fn contains(&self, grant: &Grant) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Enumerated(grants) => grants.contains(grant),
        }
    }

    /// Returns true if a record readable by any of `grants` is visible.
    #[must_use]
    pub fn allows_any(&self, grants: &[Grant]) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Enumerated(_) => grants.iter().any(|grant| self.contains(grant)),
        }
    }
}

impl Extend<Grant> for Permissions {
    fn extend<T: IntoIterator<Item = Grant>>(&mut self, iter: T) {
        for grant in iter {
            self.push(grant);
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Builds the capability set for a principal.
///
/// `None` yields the anonymous set. The domain owner gets the unrestricted
/// set regardless of its other claims.
#[must_use]
pub fn permissions(auth: Option<&Authorization>, identity: Option<&Identity>) -> Permissions {
    let Some(auth) = auth else {
        return Permissions::anonymous();
    };

    if auth.domain_owner {
        return Permissions::unrestricted();
    }

    let mut result = Permissions::anonymous();

    if let Some(user_id) = auth.user_id {
        result.push(Grant::Authenticated);
        result.push(Grant::User(user_id));
        result.extend(auth.group_ids.iter().copied().map(Grant::Group));
    }

    if let Some(identity) = identity {
        result.extend(identity.privilege_ids().iter().copied().map(Grant::Privilege));
    }

    result
}
