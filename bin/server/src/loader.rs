//! Loading of the policy document and seed data from disk.

use crate::error::StartupError;
use gatehouse_authz::Policy;
use gatehouse_identity::{Identity, MemoryIdentityStore, MemoryUserStore, User};
use gatehouse_signature::{MemoryKeyResolver, PublicKey};
use rootcause::prelude::Report;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Stores backing a running server.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub identities: Arc<MemoryIdentityStore>,
    pub users: Arc<MemoryUserStore>,
    pub keys: Arc<MemoryKeyResolver>,
}

/// On-disk seed format.
#[derive(Debug, Default, Deserialize)]
struct SeedDocument {
    #[serde(default)]
    identities: Vec<Identity>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    keys: Vec<ActorKey>,
}

/// A remote actor's public key.
#[derive(Debug, Deserialize)]
struct ActorKey {
    actor: String,
    public_key_pem: String,
}

fn read(path: &Path) -> Result<String, Report<StartupError>> {
    std::fs::read_to_string(path).map_err(|e| {
        StartupError::Read {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Loads the policy document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid policy.
pub fn load_policy(path: &Path) -> Result<Policy, Report<StartupError>> {
    let policy = Policy::from_json(&read(path)?).map_err(|e| StartupError::Policy {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    info!(path = %path.display(), actions = policy.len(), "loaded policy");
    Ok(policy)
}

/// Loads identities, users and actor keys from a seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON, or holds
/// a key that cannot be parsed.
pub fn load_seed(path: &Path) -> Result<Stores, Report<StartupError>> {
    let seed_error = |details: String| StartupError::Seed {
        path: path.to_path_buf(),
        details,
    };

    let document: SeedDocument =
        serde_json::from_str(&read(path)?).map_err(|e| seed_error(e.to_string()))?;

    let mut keys = Vec::with_capacity(document.keys.len());
    for key in document.keys {
        let public_key = PublicKey::from_pem(&key.public_key_pem)
            .map_err(|e| seed_error(format!("key for '{}': {}", key.actor, e)))?;
        keys.push((key.actor, public_key));
    }

    info!(
        path = %path.display(),
        identities = document.identities.len(),
        users = document.users.len(),
        keys = keys.len(),
        "loaded seed data"
    );

    Ok(Stores {
        identities: Arc::new(MemoryIdentityStore::with_identities(document.identities)),
        users: Arc::new(MemoryUserStore::with_users(document.users)),
        keys: Arc::new(MemoryKeyResolver::with_keys(keys)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_identity::IdentityStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn loads_policy() {
        let file = write_temp(
            r#"{"actions":{"view":{"states":{"published":{"roles":["anonymous"]}}}}}"#,
        );
        let policy = load_policy(file.path()).expect("policy");
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn invalid_policy_is_reported() {
        let file = write_temp("{ not json");
        let err = load_policy(file.path()).expect_err("invalid");
        assert!(matches!(
            err.current_context(),
            StartupError::Policy { .. }
        ));
    }

    #[test]
    fn misshapen_policy_is_reported() {
        let file = write_temp(r#"{"actions":{"view":{"roles":{"published":["anonymous"]}}}}"#);
        let err = load_policy(file.path()).expect_err("unknown field");
        assert!(matches!(
            err.current_context(),
            StartupError::Policy { .. }
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_policy(Path::new("/nonexistent/policy.json")).expect_err("missing");
        assert!(matches!(err.current_context(), StartupError::Read { .. }));
    }

    #[tokio::test]
    async fn loads_seed() {
        let identity = Identity::new().with_activitypub_actor("https://remote.example/users/ada");
        let json = serde_json::json!({
            "identities": [identity],
            "users": [User::new("ada@example.com")],
        });
        let file = write_temp(&json.to_string());

        let stores = load_seed(file.path()).expect("seed");
        assert_eq!(stores.identities.len().await, 1);
        let loaded = stores
            .identities
            .load_by_activitypub_actor("https://remote.example/users/ada")
            .await
            .expect("identity");
        assert_eq!(loaded.id(), identity.id());
    }

    #[test]
    fn bad_key_is_reported() {
        let file = write_temp(
            r#"{"keys":[{"actor":"https://remote.example/users/ada","public_key_pem":"nope"}]}"#,
        );
        let err = load_seed(file.path()).expect_err("bad key");
        assert!(matches!(err.current_context(), StartupError::Seed { .. }));
    }
}
