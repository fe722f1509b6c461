//! A verified (or mocked) request signature.

use chrono::{DateTime, Utc};

/// The algorithm reported by signatures built from the `Mock-Key-Id` header.
pub(crate) const MOCK_ALGORITHM: &str = "MOCK";

/// A signature that has passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    key_id: String,
    algorithm: String,
    headers: Vec<String>,
    signature: Vec<u8>,
    expires: DateTime<Utc>,
}

impl Signature {
    pub(crate) fn new(
        key_id: String,
        algorithm: String,
        headers: Vec<String>,
        signature: Vec<u8>,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            key_id,
            algorithm,
            headers,
            signature,
            expires,
        }
    }

    /// Builds the signature used by the local development bypass.
    ///
    /// It covers no headers, carries no signature bytes and never expires.
    pub(crate) fn mock(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            algorithm: MOCK_ALGORITHM.to_string(),
            headers: Vec::new(),
            signature: Vec::new(),
            expires: DateTime::<Utc>::MAX_UTC,
        }
    }

    /// Returns the key ID as sent by the signer.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Returns the actor URL: the key ID without its fragment.
    ///
    /// `https://remote.example/users/ada#main-key` becomes
    /// `https://remote.example/users/ada`.
    #[must_use]
    pub fn actor(&self) -> &str {
        actor_of(&self.key_id)
    }

    /// Returns the algorithm the signature was checked with.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Returns the headers covered by the signature, lowercased.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns true if `header` is covered by the signature.
    #[must_use]
    pub fn covers(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h.eq_ignore_ascii_case(header))
    }

    /// Returns the decoded signature bytes. Empty for mock signatures.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.signature
    }

    /// Returns when the signature stops being acceptable.
    #[must_use]
    pub fn expires(&self) -> DateTime<Utc> {
        self.expires
    }

    /// Returns true if this came from the development bypass.
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.algorithm == MOCK_ALGORITHM
    }
}

pub(crate) fn actor_of(key_id: &str) -> &str {
    key_id.split_once('#').map_or(key_id, |(actor, _)| actor)
}
