//! Turns a signed request into a capability set.

use crate::host::{is_local_host, request_host};
use crate::signature::Signature;
use crate::verifier::HttpSignatureVerifier;
use chrono::{DateTime, Utc};
use gatehouse_authz::{Permissions, permissions};
use gatehouse_identity::{Authorization, IdentityStore, UserStore};
use http::request::Parts;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Header carrying a literal key ID for the local development bypass.
pub const MOCK_KEY_ID_HEADER: &str = "mock-key-id";

/// Builds a mock signature from the `Mock-Key-Id` header.
///
/// This is the only way a request can authenticate without a verified
/// signature. It returns `None` unless the request is addressed to a local
/// host (see [`is_local_host`]), whatever headers are present.
#[must_use]
pub fn mock_signature(parts: &Parts) -> Option<Signature> {
    let key_id = parts
        .headers
        .get(MOCK_KEY_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key_id| !key_id.is_empty())?;

    let host = request_host(parts).unwrap_or_default();
    if !is_local_host(host) {
        warn!(host, "ignoring Mock-Key-Id header for non-local host");
        return None;
    }

    debug!(host, key_id, "accepting mock signature");
    Some(Signature::mock(key_id))
}

/// The outcome of authenticating a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated {
    /// The capability set of the signer.
    pub permissions: Permissions,
    /// The authorization derived for the signer. `None` when anonymous.
    pub authorization: Option<Authorization>,
    /// The signature the signer was recognized by. `None` when anonymous.
    pub signature: Option<Signature>,
}

impl Authenticated {
    /// The result for a request with no recognized signer.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            permissions: Permissions::anonymous(),
            authorization: None,
            signature: None,
        }
    }
}

/// Authenticates federated requests by their HTTP signature.
#[derive(Clone)]
pub struct SignatureAuthenticator {
    verifier: HttpSignatureVerifier,
    identities: Arc<dyn IdentityStore>,
    users: Arc<dyn UserStore>,
}

impl SignatureAuthenticator {
    /// Creates an authenticator.
    #[must_use]
    pub fn new(
        verifier: HttpSignatureVerifier,
        identities: Arc<dyn IdentityStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            verifier,
            identities,
            users,
        }
    }

    /// Returns the capability set of the request's signer.
    ///
    /// Never fails: an unsigned request, a bad signature or an unknown actor
    /// all yield the anonymous set.
    pub async fn parse_http_signature(&self, parts: &Parts) -> Permissions {
        self.authorize_http_signature(parts).await.0
    }

    /// Like [`parse_http_signature`](Self::parse_http_signature), for callers
    /// that may not have a request at all.
    pub async fn parse_http_signature_opt(&self, parts: Option<&Parts>) -> Permissions {
        match parts {
            Some(parts) => self.parse_http_signature(parts).await,
            None => Permissions::anonymous(),
        }
    }

    /// Returns the capability set and the `Authorization` derived for the
    /// request's signer.
    ///
    /// The authorization is `None` whenever the capability set is anonymous.
    pub async fn authorize_http_signature(
        &self,
        parts: &Parts,
    ) -> (Permissions, Option<Authorization>) {
        let authenticated = self.authenticate(parts).await;
        (authenticated.permissions, authenticated.authorization)
    }

    /// Authenticates the request, keeping the signature it was recognized by.
    ///
    /// Callers that read the request body use the signature to check a
    /// signed `Digest` header (see [`verify_digest`](crate::verify_digest)).
    pub async fn authenticate(&self, parts: &Parts) -> Authenticated {
        self.authenticate_at(parts, Utc::now()).await
    }

    #[instrument(skip(self, parts), fields(method = %parts.method, uri = %parts.uri))]
    pub(crate) async fn authenticate_at(&self, parts: &Parts, now: DateTime<Utc>) -> Authenticated {
        let signature = match self.verifier.verify_at(parts, now).await {
            Ok(signature) => signature,
            Err(e) => {
                debug!(error = %e, "signature verification failed");
                match mock_signature(parts) {
                    Some(signature) => signature,
                    None => return Authenticated::anonymous(),
                }
            }
        };

        let actor = signature.actor();
        let identity = match self.identities.load_by_activitypub_actor(actor).await {
            Ok(identity) if identity.is_retired() => {
                warn!(actor, identity_id = %identity.id(), "signing identity is retired");
                return Authenticated::anonymous();
            }
            Ok(identity) => identity,
            Err(e) => {
                warn!(actor, error = %e, "no identity for signing actor");
                return Authenticated::anonymous();
            }
        };

        let mut auth = Authorization::for_identity(identity.id());

        if let Some(email) = identity.email() {
            match self.users.load_by_email(email).await {
                Ok(user) => {
                    debug!(actor, user_id = %user.id(), "identity linked to local user");
                    auth.user_id = Some(user.id());
                    auth.group_ids = user.group_ids().to_vec();
                }
                Err(e) => debug!(actor, error = %e, "no local user for identity email"),
            }
        }

        debug!(
            actor,
            identity_id = %identity.id(),
            mock = signature.is_mock(),
            "request authenticated by signature"
        );
        Authenticated {
            permissions: permissions(Some(&auth), Some(&identity)),
            authorization: Some(auth),
            signature: Some(signature),
        }
    }
}
