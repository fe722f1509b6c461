//! Role names and single-role checks.

use crate::error::AccessError;
use crate::evaluator::AccessEvaluator;
use crate::lister::AccessLister;
use gatehouse_identity::Authorization;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// A role required by a policy.
///
/// Five names are reserved and have fixed meaning. Every other name is a
/// custom role that the protected object maps to groups or privileges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Everyone, signed in or not.
    Anonymous,
    /// Any signed-in local user.
    Authenticated,
    /// The author of the object.
    Author,
    /// The user the object describes.
    Myself,
    /// The owner of the domain.
    Owner,
    /// A role resolved through the object.
    Custom(String),
}

impl Role {
    /// Returns the role name as written in policies.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticated => "authenticated",
            Self::Author => "author",
            Self::Myself => "myself",
            Self::Owner => "owner",
            Self::Custom(name) => name,
        }
    }

    /// Returns true for the five reserved role names.
    #[must_use]
    pub fn is_magic(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        match name {
            "anonymous" => Self::Anonymous,
            "authenticated" => Self::Authenticated,
            "author" => Self::Author,
            "myself" | "self" => Self::Myself,
            "owner" => Self::Owner,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        match Self::from(name.as_str()) {
            Self::Custom(_) => Self::Custom(name),
            magic => magic,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Custom(name) => name,
            magic => magic.as_str().to_string(),
        }
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AccessEvaluator {
    /// Checks whether the principal holds a single role on an object.
    ///
    /// Custom roles are tried as group membership first, then as a privilege
    /// of the attached identity.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::IdentityLookup` if the identity store fails
    /// while resolving privileges.
    #[instrument(skip(self, auth, object), fields(role = %role))]
    pub async fn user_has_role<L>(
        &self,
        auth: &Authorization,
        object: &L,
        role: &Role,
    ) -> Result<bool, Report<AccessError>>
    where
        L: AccessLister + ?Sized,
    {
        let name = match role {
            Role::Anonymous => return Ok(true),
            Role::Authenticated => return Ok(auth.is_authenticated()),
            Role::Author => return Ok(auth.user_id.is_some_and(|id| object.is_author(&id))),
            Role::Myself => return Ok(auth.user_id.is_some_and(|id| object.is_myself(&id))),
            Role::Owner => return Ok(auth.domain_owner),
            Role::Custom(name) => name,
        };

        let roles = [name.clone()];
        let group_ids = object.roles_to_group_ids(&roles);
        if auth.is_group_member(&group_ids) {
            return Ok(true);
        }

        if auth.is_identity() {
            return self.has_privilege(auth, object, &roles).await;
        }

        Ok(false)
    }

    /// Checks whether the user belongs to a group named by an invitation token.
    ///
    /// # Errors
    ///
    /// Always returns `AccessError::NotImplemented`.
    pub fn user_in_group(
        &self,
        _auth: &Authorization,
        _token: &str,
    ) -> Result<bool, Report<AccessError>> {
        Err(AccessError::NotImplemented {
            operation: "user_in_group",
        }
        .into())
    }

    /// Checks whether the object's author belongs to a group.
    ///
    /// # Errors
    ///
    /// Always returns `AccessError::NotImplemented`.
    pub fn author_in_group<L>(&self, _object: &L, _token: &str) -> Result<bool, Report<AccessError>>
    where
        L: AccessLister + ?Sized,
    {
        Err(AccessError::NotImplemented {
            operation: "author_in_group",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lister::{AccessRecord, RoleGrants};
    use gatehouse_core::{GroupId, PrivilegeId, UserId};
    use gatehouse_identity::{Identity, MemoryIdentityStore};
    use std::sync::Arc;

    fn evaluator_with(identities: Vec<Identity>) -> AccessEvaluator {
        AccessEvaluator::new(Arc::new(MemoryIdentityStore::with_identities(identities)))
    }

    #[test]
    fn parses_magic_role_names() {
        assert_eq!(Role::from("anonymous"), Role::Anonymous);
        assert_eq!(Role::from("authenticated"), Role::Authenticated);
        assert_eq!(Role::from("author"), Role::Author);
        assert_eq!(Role::from("myself"), Role::Myself);
        assert_eq!(Role::from("self"), Role::Myself);
        assert_eq!(Role::from("owner"), Role::Owner);
        assert_eq!(Role::from("editor"), Role::Custom("editor".to_string()));
    }

    #[test]
    fn near_miss_names_stay_custom() {
        let role: Role = "Anonymous".parse().expect("infallible");
        assert!(!role.is_magic());
        assert_eq!(role.as_str(), "Anonymous");
    }

    #[test]
    fn role_serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::Myself).expect("serialize");
        assert_eq!(json, "\"myself\"");
        let role: Role = serde_json::from_str("\"subscriber\"").expect("deserialize");
        assert_eq!(role, Role::Custom("subscriber".to_string()));
    }

    #[tokio::test]
    async fn magic_roles_use_fixed_semantics() {
        let evaluator = evaluator_with(Vec::new());
        let author = UserId::new();
        let object = AccessRecord::new("published").with_author(author);

        let anonymous = Authorization::anonymous();
        let signed_in = Authorization::for_user(author, Vec::new());
        let owner = Authorization::for_user(UserId::new(), Vec::new()).with_domain_owner(true);

        assert!(evaluator.user_has_role(&anonymous, &object, &Role::Anonymous).await.unwrap());
        assert!(!evaluator.user_has_role(&anonymous, &object, &Role::Authenticated).await.unwrap());
        assert!(evaluator.user_has_role(&signed_in, &object, &Role::Authenticated).await.unwrap());
        assert!(evaluator.user_has_role(&signed_in, &object, &Role::Author).await.unwrap());
        assert!(!evaluator.user_has_role(&owner, &object, &Role::Author).await.unwrap());
        assert!(evaluator.user_has_role(&owner, &object, &Role::Owner).await.unwrap());
        assert!(!evaluator.user_has_role(&signed_in, &object, &Role::Owner).await.unwrap());
    }

    #[tokio::test]
    async fn myself_matches_the_described_user() {
        let evaluator = evaluator_with(Vec::new());
        let user = UserId::new();
        let object = AccessRecord::new("active").with_subject(user);

        let me = Authorization::for_user(user, Vec::new());
        let other = Authorization::for_user(UserId::new(), Vec::new());
        assert!(evaluator.user_has_role(&me, &object, &Role::Myself).await.unwrap());
        assert!(!evaluator.user_has_role(&other, &object, &Role::Myself).await.unwrap());
    }

    #[tokio::test]
    async fn custom_role_checks_groups_then_privileges() {
        let group = GroupId::new();
        let privilege = PrivilegeId::new();
        let identity = Identity::new().with_privileges([privilege]);
        let identity_id = identity.id();
        let evaluator = evaluator_with(vec![identity]);

        let object = AccessRecord::new("published").with_role(
            "member",
            RoleGrants::default()
                .with_groups([group])
                .with_privileges([privilege]),
        );
        let role = Role::from("member");

        let grouped = Authorization::for_user(UserId::new(), vec![group]);
        let purchased = Authorization::for_identity(identity_id);
        let stranger = Authorization::for_user(UserId::new(), Vec::new());

        assert!(evaluator.user_has_role(&grouped, &object, &role).await.unwrap());
        assert!(evaluator.user_has_role(&purchased, &object, &role).await.unwrap());
        assert!(!evaluator.user_has_role(&stranger, &object, &role).await.unwrap());
    }

    #[test]
    fn unimplemented_checks_are_not_denials() {
        let evaluator = evaluator_with(Vec::new());
        let auth = Authorization::anonymous();
        let object = AccessRecord::new("published");

        let err = evaluator
            .user_in_group(&auth, "token")
            .expect_err("not implemented");
        assert_eq!(
            err.current_context(),
            &AccessError::NotImplemented {
                operation: "user_in_group"
            }
        );

        let err = evaluator
            .author_in_group(&object, "token")
            .expect_err("not implemented");
        assert_eq!(
            err.current_context(),
            &AccessError::NotImplemented {
                operation: "author_in_group"
            }
        );
    }
}
