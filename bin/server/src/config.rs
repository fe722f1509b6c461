//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (`SIGNATURE__MAX_AGE_SECONDS=3600`).
//!
//! See [`SignatureConfig`](gatehouse_signature::SignatureConfig) for
//! signature verification settings.

use crate::error::StartupError;
use gatehouse_signature::SignatureConfig;
use rootcause::prelude::Report;
use serde::Deserialize;
use std::path::PathBuf;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path to the JSON policy document.
    pub policy_path: PathBuf,

    /// Path to the JSON seed file with identities, users and actor keys.
    /// Without one the server starts with empty stores.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// HTTP signature verification settings.
    #[serde(default)]
    pub signature: SignatureConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `StartupError::Config` if required configuration is missing
    /// or invalid, including out-of-range signature durations.
    pub fn from_env() -> Result<Self, Report<StartupError>> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(environment: config::Environment) -> Result<Self, Report<StartupError>> {
        config::Config::builder()
            .add_source(environment.separator("__").try_parsing(true))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| {
                StartupError::Config {
                    details: e.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, Report<StartupError>> {
        let source = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        ServerConfig::from_environment(config::Environment::default().source(Some(source)))
    }

    #[test]
    fn applies_defaults() {
        let config = load(&[("POLICY_PATH", "/etc/gatehouse/policy.json")]).expect("load");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.policy_path, PathBuf::from("/etc/gatehouse/policy.json"));
        assert!(config.seed_path.is_none());
        assert_eq!(config.signature.max_age(), Duration::hours(12));
    }

    #[test]
    fn reads_nested_signature_settings() {
        let config = load(&[
            ("POLICY_PATH", "policy.json"),
            ("SEED_PATH", "seed.json"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("SIGNATURE__MAX_AGE_SECONDS", "60"),
            ("SIGNATURE__REQUIRED_HEADERS", "(request-target),host,date,digest"),
        ])
        .expect("load");

        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.seed_path, Some(PathBuf::from("seed.json")));
        assert_eq!(config.signature.max_age(), Duration::seconds(60));
        assert_eq!(
            config.signature.required_headers(),
            vec!["(request-target)", "host", "date", "digest"]
        );
    }

    #[test]
    fn policy_path_is_required() {
        let err = load(&[]).expect_err("missing policy path");
        assert!(matches!(err.current_context(), StartupError::Config { .. }));
    }

    #[test]
    fn out_of_range_signature_durations_are_rejected() {
        for (key, value) in [
            ("SIGNATURE__MAX_AGE_SECONDS", "9223372036854775807"),
            ("SIGNATURE__MAX_AGE_SECONDS", "-1"),
            ("SIGNATURE__CLOCK_SKEW_SECONDS", "-300"),
        ] {
            let err = load(&[("POLICY_PATH", "policy.json"), (key, value)])
                .expect_err("out of range");
            match err.current_context() {
                StartupError::Config { details } => {
                    assert!(details.contains("out of range"), "{key}={value}: {details}");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
