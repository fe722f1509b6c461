//! Privilege resolution for verified identities.

use crate::error::AccessError;
use crate::evaluator::AccessEvaluator;
use crate::lister::AccessLister;
use gatehouse_identity::Authorization;
use rootcause::prelude::Report;
use tracing::debug;

impl AccessEvaluator {
    /// Checks whether the attached identity holds a privilege for any of `roles`.
    ///
    /// No store call is made unless the roles map to at least one privilege.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::IdentityLookup` if the identity cannot be loaded.
    pub(crate) async fn has_privilege<L>(
        &self,
        auth: &Authorization,
        object: &L,
        roles: &[String],
    ) -> Result<bool, Report<AccessError>>
    where
        L: AccessLister + ?Sized,
    {
        if roles.is_empty() {
            return Ok(false);
        }

        let required = object.roles_to_privilege_ids(roles);
        if required.is_empty() {
            return Ok(false);
        }

        let Some(identity_id) = auth.identity_id else {
            return Ok(false);
        };

        let identity = self
            .identities
            .load_by_id(identity_id)
            .await
            .map_err(|e| AccessError::IdentityLookup {
                identity_id,
                details: e.to_string(),
            })?;

        let granted = identity.has_any_privilege(&required);
        debug!(%identity_id, granted, "privilege check result");
        Ok(granted)
    }
}
