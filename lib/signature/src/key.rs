//! Public keys and the resolver that fetches them.

use crate::error::SignatureError;
use async_trait::async_trait;
use ed25519_dalek::VerifyingKey;
use rootcause::prelude::Report;
use rsa::RsaPublicKey;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A public key able to verify request signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// RSA key, used with PKCS#1 v1.5 and SHA-256.
    Rsa(RsaPublicKey),
    /// Ed25519 key.
    Ed25519(VerifyingKey),
}

impl PublicKey {
    /// Parses a PEM-encoded key.
    ///
    /// Accepts SubjectPublicKeyInfo (`PUBLIC KEY`) for RSA and Ed25519, and
    /// PKCS#1 (`RSA PUBLIC KEY`) for RSA.
    ///
    /// # Errors
    ///
    /// Returns `SignatureError::InvalidKey` if no format matches.
    pub fn from_pem(pem: &str) -> Result<Self, Report<SignatureError>> {
        let pem = pem.trim();

        if let Ok(key) = <RsaPublicKey as rsa::pkcs8::DecodePublicKey>::from_public_key_pem(pem) {
            return Ok(Self::Rsa(key));
        }

        if let Ok(key) =
            <VerifyingKey as ed25519_dalek::pkcs8::DecodePublicKey>::from_public_key_pem(pem)
        {
            return Ok(Self::Ed25519(key));
        }

        <RsaPublicKey as rsa::pkcs1::DecodeRsaPublicKey>::from_pkcs1_pem(pem)
            .map(Self::Rsa)
            .map_err(|e| {
                SignatureError::InvalidKey {
                    details: e.to_string(),
                }
                .into()
            })
    }

    /// Builds an Ed25519 key from its raw 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns `SignatureError::InvalidKey` if the bytes are not a valid point.
    pub fn ed25519_from_bytes(bytes: &[u8; 32]) -> Result<Self, Report<SignatureError>> {
        let key = VerifyingKey::from_bytes(bytes).map_err(|e| SignatureError::InvalidKey {
            details: e.to_string(),
        })?;
        Ok(Self::Ed25519(key))
    }

    /// Returns the algorithm name used in signature headers for this key.
    #[must_use]
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Rsa(_) => "rsa-sha256",
            Self::Ed25519(_) => "ed25519",
        }
    }
}

/// Fetches the public key of the actor that signed a request.
///
/// Typically backed by an HTTP fetch of the actor document plus a cache;
/// the verifier applies no timeout or retry of its own.
#[async_trait]
pub trait PublicKeyResolver: Send + Sync {
    /// Resolves the key for an actor URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is unknown or its key cannot be fetched.
    async fn resolve(&self, actor: &str) -> Result<PublicKey, Report<SignatureError>>;
}

/// Resolver over a fixed set of keys.
#[derive(Debug, Default)]
pub struct MemoryKeyResolver {
    keys: RwLock<HashMap<String, PublicKey>>,
}

impl MemoryKeyResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver from actor/key pairs.
    #[must_use]
    pub fn with_keys(keys: impl IntoIterator<Item = (String, PublicKey)>) -> Self {
        Self {
            keys: RwLock::new(keys.into_iter().collect()),
        }
    }

    /// Registers or replaces an actor's key.
    pub async fn insert(&self, actor: impl Into<String>, key: PublicKey) {
        self.keys.write().await.insert(actor.into(), key);
    }
}

#[async_trait]
impl PublicKeyResolver for MemoryKeyResolver {
    async fn resolve(&self, actor: &str) -> Result<PublicKey, Report<SignatureError>> {
        self.keys.read().await.get(actor).cloned().ok_or_else(|| {
            SignatureError::KeyResolution {
                actor: actor.to_string(),
                details: "unknown actor".to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{rsa_key_pair, signing_key};
    use ed25519_dalek::pkcs8::EncodePublicKey as _;
    use rsa::pkcs1::EncodeRsaPublicKey as _;

    #[test]
    fn parses_ed25519_spki_pem() {
        let verifying = signing_key().verifying_key();
        let pem = verifying
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .expect("encode");

        let key = PublicKey::from_pem(&pem).expect("parse");
        assert_eq!(key, PublicKey::Ed25519(verifying));
        assert_eq!(key.algorithm(), "ed25519");
    }

    #[test]
    fn parses_rsa_pem_formats() {
        let (_, public) = rsa_key_pair();

        let spki = <RsaPublicKey as rsa::pkcs8::EncodePublicKey>::to_public_key_pem(
            &public,
            rsa::pkcs8::LineEnding::LF,
        )
        .expect("encode spki");
        assert_eq!(
            PublicKey::from_pem(&spki).expect("parse spki"),
            PublicKey::Rsa(public.clone())
        );

        let pkcs1 = public
            .to_pkcs1_pem(rsa::pkcs8::LineEnding::LF)
            .expect("encode pkcs1");
        assert_eq!(
            PublicKey::from_pem(&pkcs1).expect("parse pkcs1"),
            PublicKey::Rsa(public)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(PublicKey::from_pem("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----").is_err());
    }

    #[tokio::test]
    async fn memory_resolver_looks_up_actor() {
        let key = PublicKey::Ed25519(signing_key().verifying_key());
        let resolver = MemoryKeyResolver::new();
        resolver.insert("https://remote.example/users/ada", key.clone()).await;

        assert_eq!(
            resolver
                .resolve("https://remote.example/users/ada")
                .await
                .expect("known actor"),
            key
        );
        assert!(resolver.resolve("https://remote.example/users/bob").await.is_err());
    }
}
