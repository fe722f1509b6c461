//! Authorization error types.
//!
//! A denied decision is `Ok(false)`, never an error. Errors here mean the
//! decision itself could not be made.

use gatehouse_core::IdentityId;
use std::fmt;

/// Errors from access decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The identity store failed while resolving privileges.
    IdentityLookup {
        /// The identity being loaded.
        identity_id: IdentityId,
        /// Error details.
        details: String,
    },
    /// The check has no implementation yet.
    NotImplemented {
        /// The check that was requested.
        operation: &'static str,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityLookup {
                identity_id,
                details,
            } => {
                write!(f, "failed to load identity '{}': {}", identity_id, details)
            }
            Self::NotImplemented { operation } => {
                write!(f, "access check '{}' is not implemented", operation)
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// Errors from loading a policy definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The policy document could not be parsed.
    Invalid {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { details } => write!(f, "invalid policy: {}", details),
        }
    }
}

impl std::error::Error for PolicyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_lookup_display() {
        let identity_id = IdentityId::new();
        let err = AccessError::IdentityLookup {
            identity_id,
            details: "connection refused".to_string(),
        };
        assert!(err.to_string().contains(&identity_id.to_string()));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn not_implemented_display() {
        let err = AccessError::NotImplemented {
            operation: "user_in_group",
        };
        assert_eq!(
            err.to_string(),
            "access check 'user_in_group' is not implemented"
        );
    }
}
