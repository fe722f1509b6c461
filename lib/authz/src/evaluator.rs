//! The access decision evaluator.

use crate::error::AccessError;
use crate::lister::AccessLister;
use crate::policy::PolicySource;
use gatehouse_identity::{Authorization, IdentityStore};
use rootcause::prelude::Report;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Decides whether a principal may perform an action on an object.
///
/// Holds nothing but the identity store it consults for privilege checks, so
/// a single evaluator can serve concurrent requests.
#[derive(Clone)]
pub struct AccessEvaluator {
    pub(crate) identities: Arc<dyn IdentityStore>,
}

impl AccessEvaluator {
    /// Creates an evaluator backed by an identity store.
    #[must_use]
    pub fn new(identities: Arc<dyn IdentityStore>) -> Self {
        Self { identities }
    }

    /// Decides whether `auth` may perform `action_id` on `object`.
    ///
    /// Checks run in a fixed order and the first match allows:
    /// anonymous, domain owner, authenticated, author, self, groups, and
    /// finally identity privileges. An action missing from the policy is
    /// logged and denied.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::IdentityLookup` if the identity store fails
    /// while resolving privileges. Callers must treat this as a denial caused
    /// by a fault, distinct from `Ok(false)`.
    #[instrument(skip(self, auth, policy, object), fields(state = object.state()))]
    pub async fn user_can<P, L>(
        &self,
        auth: &Authorization,
        policy: &P,
        object: &L,
        action_id: &str,
    ) -> Result<bool, Report<AccessError>>
    where
        P: PolicySource + ?Sized,
        L: AccessLister + ?Sized,
    {
        let Some(action) = policy.action(action_id) else {
            error!(action_id, "action not declared by policy");
            return Ok(false);
        };

        let access = action.access_list(object.state());

        if access.anonymous {
            return Ok(true);
        }

        if auth.is_authenticated() {
            if auth.domain_owner {
                return Ok(true);
            }

            if access.authenticated {
                return Ok(true);
            }
        }

        if let Some(user_id) = auth.user_id {
            if access.author && object.is_author(&user_id) {
                return Ok(true);
            }

            if access.myself && object.is_myself(&user_id) {
                return Ok(true);
            }
        }

        if !access.groups.is_empty() {
            let group_ids = object.roles_to_group_ids(&access.groups);
            if auth.is_group_member(&group_ids) {
                return Ok(true);
            }
        }

        if auth.is_identity() && self.has_privilege(auth, object, &access.privileges).await? {
            return Ok(true);
        }

        debug!("no access rule matched");
        Ok(false)
    }
}
