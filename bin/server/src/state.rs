//! Shared application state.

use crate::loader::Stores;
use gatehouse_authz::{AccessEvaluator, Policy};
use gatehouse_identity::{IdentityStore, UserStore};
use gatehouse_signature::{
    HttpSignatureVerifier, PublicKeyResolver, SignatureAuthenticator, SignatureConfig,
};
use std::sync::Arc;

/// Everything a handler needs to authenticate and decide.
pub struct AppState {
    /// Authenticates signed requests.
    pub authenticator: SignatureAuthenticator,
    /// Makes access decisions.
    pub evaluator: AccessEvaluator,
    /// The loaded policy document.
    pub policy: Policy,
}

impl AppState {
    /// Wires the authenticator and evaluator to the given stores.
    pub fn new(policy: Policy, stores: Stores, signature: SignatureConfig) -> Self {
        Self::with_stores(policy, stores.identities, stores.users, stores.keys, signature)
    }

    /// Like [`new`](Self::new), for stores other than the in-memory ones.
    pub fn with_stores(
        policy: Policy,
        identities: Arc<dyn IdentityStore>,
        users: Arc<dyn UserStore>,
        keys: Arc<dyn PublicKeyResolver>,
        signature: SignatureConfig,
    ) -> Self {
        let verifier = HttpSignatureVerifier::new(keys, signature);
        Self {
            authenticator: SignatureAuthenticator::new(verifier, identities.clone(), users),
            evaluator: AccessEvaluator::new(identities),
            policy,
        }
    }
}
