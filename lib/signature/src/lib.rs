//! HTTP signature authentication for gatehouse.
//!
//! Federated requests carry no session. They prove who sent them with an
//! HTTP signature (the draft-cavage convention ActivityPub servers use), and
//! [`SignatureAuthenticator`] turns a verified signature into a capability
//! set by way of the identity and user stores.
//!
//! Authentication never fails loudly: anything short of a verified signature
//! from a known actor yields the anonymous capability set.
//!
//! # Development bypass
//!
//! When real verification fails and the request is addressed to a local host
//! (`localhost`, `*.localhost`, loopback addresses), a `Mock-Key-Id` header is
//! accepted in place of a signature. See [`mock_signature`]. The bypass is
//! never honored for any other host.

mod authenticator;
mod config;
mod error;
mod header;
mod host;
mod key;
mod signature;
mod verifier;

pub use authenticator::{
    Authenticated, MOCK_KEY_ID_HEADER, SignatureAuthenticator, mock_signature,
};
pub use config::SignatureConfig;
pub use error::{SignatureConfigError, SignatureError};
pub use host::{is_local_host, request_host};
pub use key::{MemoryKeyResolver, PublicKey, PublicKeyResolver};
pub use signature::Signature;
pub use verifier::{HttpSignatureVerifier, verify_digest};

#[cfg(test)]
mod test_support;
