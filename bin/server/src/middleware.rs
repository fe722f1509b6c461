//! Signature authentication extractor for Axum.

use crate::state::AppState;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use gatehouse_authz::Permissions;
use gatehouse_identity::Authorization;
use gatehouse_signature::{Authenticated, Signature, verify_digest};
use std::sync::Arc;
use tracing::warn;

/// The principal behind a request, as established by its HTTP signature.
///
/// Never rejects: unsigned or badly signed requests extract as anonymous.
#[derive(Debug, Clone)]
pub struct SignedPrincipal {
    /// The capability set of the signer.
    pub permissions: Permissions,
    /// The authorization derived for the signer, if one was recognized.
    pub authorization: Option<Authorization>,
    /// The signature the signer was recognized by.
    pub signature: Option<Signature>,
}

impl SignedPrincipal {
    /// A principal with no recognized signer.
    #[must_use]
    pub fn anonymous() -> Self {
        Authenticated::anonymous().into()
    }

    /// Checks a signed `Digest` header against the request body.
    ///
    /// A signature that covers `digest` only vouches for the body the digest
    /// describes, so on a mismatch the principal drops to anonymous.
    /// Signatures that do not cover `digest` are left alone.
    #[must_use]
    pub fn with_body(self, headers: &HeaderMap, body: &[u8]) -> Self {
        let Some(signature) = &self.signature else {
            return self;
        };
        if !signature.covers("digest") {
            return self;
        }

        match verify_digest(headers, body) {
            Ok(()) => self,
            Err(e) => {
                warn!(actor = signature.actor(), error = %e, "signed digest does not match body");
                Self::anonymous()
            }
        }
    }
}

impl From<Authenticated> for SignedPrincipal {
    fn from(authenticated: Authenticated) -> Self {
        Self {
            permissions: authenticated.permissions,
            authorization: authenticated.authorization,
            signature: authenticated.signature,
        }
    }
}

impl<S> FromRequestParts<S> for SignedPrincipal
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);
        Ok(app_state.authenticator.authenticate(parts).await.into())
    }
}
