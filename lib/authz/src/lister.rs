//! The capability interface protected objects implement.

use gatehouse_core::{GroupId, PrivilegeId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a protected object must expose to take part in access decisions.
///
/// Role names are opaque: only the object knows which groups or privileges a
/// role stands for.
pub trait AccessLister: Send + Sync {
    /// Returns the object's current lifecycle state.
    fn state(&self) -> &str;

    /// Returns true if the user authored this object.
    fn is_author(&self, user_id: &UserId) -> bool;

    /// Returns true if this object describes the user.
    fn is_myself(&self, user_id: &UserId) -> bool;

    /// Maps role names to the groups that hold them.
    fn roles_to_group_ids(&self, roles: &[String]) -> Vec<GroupId>;

    /// Maps role names to the privileges that grant them.
    fn roles_to_privilege_ids(&self, roles: &[String]) -> Vec<PrivilegeId>;
}

/// Groups and privileges that stand for one role on an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrants {
    /// Groups whose members hold the role.
    #[serde(default)]
    pub groups: Vec<GroupId>,
    /// Privileges whose holders hold the role.
    #[serde(default)]
    pub privileges: Vec<PrivilegeId>,
}

impl RoleGrants {
    /// Adds groups that hold the role.
    #[must_use]
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = GroupId>) -> Self {
        self.groups.extend(groups);
        self
    }

    /// Adds privileges that grant the role.
    #[must_use]
    pub fn with_privileges(mut self, privileges: impl IntoIterator<Item = PrivilegeId>) -> Self {
        self.privileges.extend(privileges);
        self
    }
}

/// A plain-data protected object.
///
/// Used where the object arrives as data (the decision endpoint, tests)
/// rather than as a domain type with its own `AccessLister` implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    /// Current lifecycle state.
    pub state: String,
    /// The object's author, if it has one.
    #[serde(default)]
    pub author_id: Option<UserId>,
    /// The user the object describes, if it describes one.
    #[serde(default)]
    pub subject_id: Option<UserId>,
    /// Role name to grants.
    #[serde(default)]
    pub roles: HashMap<String, RoleGrants>,
}

impl AccessRecord {
    /// Creates a record in the given state with no author and no roles.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            ..Self::default()
        }
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Sets the user this object describes.
    #[must_use]
    pub fn with_subject(mut self, subject_id: UserId) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    /// Maps a role name to grants.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>, grants: RoleGrants) -> Self {
        self.roles.insert(role.into(), grants);
        self
    }

    fn grants<'a>(&'a self, roles: &'a [String]) -> impl Iterator<Item = &'a RoleGrants> {
        roles.iter().filter_map(|role| self.roles.get(role))
    }
}

impl AccessLister for AccessRecord {
    fn state(&self) -> &str {
        &self.state
    }

    fn is_author(&self, user_id: &UserId) -> bool {
        self.author_id.as_ref() == Some(user_id)
    }

    fn is_myself(&self, user_id: &UserId) -> bool {
        self.subject_id.as_ref() == Some(user_id)
    }

    fn roles_to_group_ids(&self, roles: &[String]) -> Vec<GroupId> {
        self.grants(roles)
            .flat_map(|grants| grants.groups.iter().copied())
            .collect()
    }

    fn roles_to_privilege_ids(&self, roles: &[String]) -> Vec<PrivilegeId> {
        self.grants(roles)
            .flat_map(|grants| grants.privileges.iter().copied())
            .collect()
    }
}
