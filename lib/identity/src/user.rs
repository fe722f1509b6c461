//! Local user accounts.
//!
//! Users are owned by the surrounding application; gatehouse only needs
//! their ID, email address, and group memberships.

use gatehouse_core::{GroupId, UserId};
use serde::{Deserialize, Serialize};

/// A local account on this domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal user ID.
    id: UserId,
    /// The user's email address.
    email: String,
    /// The user's display name, if set.
    #[serde(default)]
    display_name: Option<String>,
    /// Groups the user belongs to.
    #[serde(default)]
    group_ids: Vec<GroupId>,
}

impl User {
    /// Creates a new user with a generated ID.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self::with_id(UserId::new(), email)
    }

    /// Creates a user with a known ID.
    #[must_use]
    pub fn with_id(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
            group_ids: Vec::new(),
        }
    }

    /// Sets the user's groups.
    #[must_use]
    pub fn with_groups(mut self, group_ids: Vec<GroupId>) -> Self {
        self.group_ids = group_ids;
        self
    }

    /// Sets the user's display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Returns the user ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the user's display name, if set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the groups the user belongs to.
    #[must_use]
    pub fn group_ids(&self) -> &[GroupId] {
        &self.group_ids
    }
}
