//! Policies: actions, and the access list each action carries per object state.

use crate::error::PolicyError;
use crate::role::Role;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Conditions under which one action is allowed in one object state.
///
/// `groups` and `privileges` hold role names, resolved through the target
/// object rather than globally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessList {
    /// Allow everyone.
    #[serde(default)]
    pub anonymous: bool,
    /// Allow any signed-in user.
    #[serde(default)]
    pub authenticated: bool,
    /// Allow the object's author.
    #[serde(default)]
    pub author: bool,
    /// Allow the user the object describes.
    #[serde(default, rename = "self")]
    pub myself: bool,
    /// Roles granted through group membership.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Roles granted through identity privileges.
    #[serde(default)]
    pub privileges: Vec<String>,
}

static EMPTY_ACCESS_LIST: AccessList = AccessList {
    anonymous: false,
    authenticated: false,
    author: false,
    myself: false,
    groups: Vec::new(),
    privileges: Vec::new(),
};

impl AccessList {
    /// Builds an access list from the role names a policy grants.
    ///
    /// Reserved roles set their flag; `owner` adds nothing because the domain
    /// owner is always allowed. Every custom role may be held either through
    /// a group or through a privilege.
    #[must_use]
    pub fn from_roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let mut list = Self::default();
        for role in roles {
            match role.into() {
                Role::Anonymous => list.anonymous = true,
                Role::Authenticated => list.authenticated = true,
                Role::Author => list.author = true,
                Role::Myself => list.myself = true,
                Role::Owner => {}
                Role::Custom(name) => {
                    if !list.groups.contains(&name) {
                        list.groups.push(name.clone());
                    }
                    if !list.privileges.contains(&name) {
                        list.privileges.push(name);
                    }
                }
            }
        }
        list
    }
}

/// A named action with one access list per object state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    id: String,
    states: HashMap<String, AccessList>,
}

impl Action {
    /// Creates an action that allows nothing in any state.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            states: HashMap::new(),
        }
    }

    /// Sets the access list for a state.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>, access_list: AccessList) -> Self {
        self.states.insert(state.into(), access_list);
        self
    }

    /// Returns the action ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the access list for a state.
    ///
    /// States without an entry get an empty access list.
    #[must_use]
    pub fn access_list(&self, state: &str) -> &AccessList {
        self.states.get(state).unwrap_or(&EMPTY_ACCESS_LIST)
    }
}

/// Anything that maps action IDs to actions.
pub trait PolicySource: Send + Sync {
    /// Looks up an action by ID.
    fn action(&self, action_id: &str) -> Option<&Action>;
}

/// A set of actions, typically declared by a template.
///
/// The JSON form lists role names per state:
///
/// ```json
/// {"actions": {"view": {"states": {
///     "published": {"roles": ["anonymous"]},
///     "draft": {"roles": ["author", "editor"]}
/// }}}}
/// ```
///
/// Unknown fields are rejected at every level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "PolicyDocument")]
pub struct Policy {
    actions: HashMap<String, Action>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyDocument {
    #[serde(default)]
    actions: HashMap<String, ActionDocument>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ActionDocument {
    #[serde(default)]
    states: HashMap<String, StateDocument>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StateDocument {
    #[serde(default)]
    roles: Vec<String>,
}

impl From<PolicyDocument> for Policy {
    fn from(document: PolicyDocument) -> Self {
        let actions = document
            .actions
            .into_iter()
            .map(|(id, action)| {
                let states = action
                    .states
                    .into_iter()
                    .map(|(state, document)| (state, AccessList::from_roles(document.roles)))
                    .collect();
                (id.clone(), Action { id, states })
            })
            .collect();
        Self { actions }
    }
}

impl Policy {
    /// Creates an empty policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an action.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.insert(action.id.clone(), action);
        self
    }

    /// Parses a policy from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Invalid` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, Report<PolicyError>> {
        let policy = serde_json::from_str(json).map_err(|e| PolicyError::Invalid {
            details: e.to_string(),
        })?;
        Ok(policy)
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if the policy declares no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl PolicySource for Policy {
    fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.get(action_id)
    }
}

impl PolicySource for HashMap<String, Action> {
    fn action(&self, action_id: &str) -> Option<&Action> {
        self.get(action_id)
    }
}
