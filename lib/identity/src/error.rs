//! Error types for identity and user lookups.
//!
//! Store implementations report failures as `Report<StoreError>`; callers
//! decide whether a miss is fatal (privilege checks) or a soft fallback
//! (signature authentication).

use std::fmt;

/// Errors from identity or user store lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record matched the lookup key.
    NotFound {
        /// The kind of record that was requested.
        kind: &'static str,
        /// The key used for the lookup.
        key: String,
    },
    /// The backing store could not answer.
    Unavailable {
        /// Error details.
        details: String,
    },
}

impl StoreError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Returns true if the record simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, key } => write!(f, "{kind} '{key}' not found"),
            Self::Unavailable { details } => write!(f, "store unavailable: {details}"),
        }
    }
}

impl std::error::Error for StoreError {}
