//! Signature verification errors.
//!
//! None of these reach the caller of `SignatureAuthenticator`; they are
//! logged and the request degrades to anonymous.

use std::fmt;

/// Errors from verifying an HTTP signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The request carries no signature.
    MissingHeader {
        /// The header that was expected.
        header: &'static str,
    },
    /// The signature header could not be parsed.
    Malformed {
        /// Error details.
        details: String,
    },
    /// The signature uses an algorithm this verifier does not support.
    UnsupportedAlgorithm {
        /// The declared algorithm.
        algorithm: String,
    },
    /// A header that must be signed was not, or a signed header is absent.
    MissingSignedHeader {
        /// The header name.
        header: String,
    },
    /// The signature is outside its validity window.
    Expired {
        /// Error details.
        details: String,
    },
    /// The signer's public key could not be obtained.
    KeyResolution {
        /// The actor whose key was requested.
        actor: String,
        /// Error details.
        details: String,
    },
    /// The key could not be parsed.
    InvalidKey {
        /// Error details.
        details: String,
    },
    /// The signature does not match the request.
    InvalidSignature,
    /// The body digest does not match the `Digest` header.
    DigestMismatch,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader { header } => write!(f, "missing '{header}' header"),
            Self::Malformed { details } => write!(f, "malformed signature: {details}"),
            Self::UnsupportedAlgorithm { algorithm } => {
                write!(f, "unsupported signature algorithm '{algorithm}'")
            }
            Self::MissingSignedHeader { header } => {
                write!(f, "header '{header}' is not covered by the signature")
            }
            Self::Expired { details } => write!(f, "signature expired: {details}"),
            Self::KeyResolution { actor, details } => {
                write!(f, "failed to resolve key for '{actor}': {details}")
            }
            Self::InvalidKey { details } => write!(f, "invalid public key: {details}"),
            Self::InvalidSignature => write!(f, "signature does not verify"),
            Self::DigestMismatch => write!(f, "body digest does not match"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Errors from loading a [`SignatureConfig`](crate::SignatureConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureConfigError {
    /// A duration is negative or too large to represent.
    OutOfRange {
        /// The offending setting.
        field: &'static str,
        /// The configured value.
        seconds: i64,
    },
}

impl fmt::Display for SignatureConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { field, seconds } => {
                write!(f, "{field} is out of range: {seconds}")
            }
        }
    }
}

impl std::error::Error for SignatureConfigError {}
