//! Signature verification settings.

use crate::error::SignatureConfigError;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Configuration for HTTP signature verification.
///
/// Fields with defaults can be omitted when loading from environment variables.
/// Durations are checked when the configuration is deserialized: negative
/// values, or values too large for a `TimeDelta`, are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SignatureSettings")]
pub struct SignatureConfig {
    /// How long a signature stays valid after its `Date` or `created` time,
    /// when it does not declare `expires` itself.
    /// Default: 43200 (12 hours)
    max_age_seconds: i64,
    /// How far in the future a `Date` header may be before it is rejected.
    /// Default: 300
    clock_skew_seconds: i64,
    /// Headers every signature must cover, as a comma-separated string.
    /// Default: "(request-target),host,date"
    required_headers: String,
}

/// The unchecked form of [`SignatureConfig`].
#[derive(Deserialize)]
struct SignatureSettings {
    #[serde(default = "default_max_age_seconds")]
    max_age_seconds: i64,
    #[serde(default = "default_clock_skew_seconds")]
    clock_skew_seconds: i64,
    #[serde(default = "default_required_headers")]
    required_headers: String,
}

impl TryFrom<SignatureSettings> for SignatureConfig {
    type Error = SignatureConfigError;

    fn try_from(settings: SignatureSettings) -> Result<Self, Self::Error> {
        checked_seconds("max_age_seconds", settings.max_age_seconds)?;
        checked_seconds("clock_skew_seconds", settings.clock_skew_seconds)?;
        Ok(Self {
            max_age_seconds: settings.max_age_seconds,
            clock_skew_seconds: settings.clock_skew_seconds,
            required_headers: settings.required_headers,
        })
    }
}

fn checked_seconds(field: &'static str, seconds: i64) -> Result<TimeDelta, SignatureConfigError> {
    if seconds < 0 {
        return Err(SignatureConfigError::OutOfRange { field, seconds });
    }
    TimeDelta::try_seconds(seconds).ok_or(SignatureConfigError::OutOfRange { field, seconds })
}

fn default_max_age_seconds() -> i64 {
    12 * 60 * 60
}

fn default_clock_skew_seconds() -> i64 {
    300
}

fn default_required_headers() -> String {
    "(request-target),host,date".to_string()
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: default_max_age_seconds(),
            clock_skew_seconds: default_clock_skew_seconds(),
            required_headers: default_required_headers(),
        }
    }
}

impl SignatureConfig {
    /// Sets the maximum signature age. Negative ages count as zero.
    #[must_use]
    pub fn with_max_age(mut self, max_age: TimeDelta) -> Self {
        self.max_age_seconds = max_age.num_seconds().max(0);
        self
    }

    /// Sets the headers every signature must cover.
    #[must_use]
    pub fn with_required_headers(mut self, headers: &[&str]) -> Self {
        self.required_headers = headers.join(",");
        self
    }

    /// Returns the maximum signature age.
    #[must_use]
    pub fn max_age(&self) -> TimeDelta {
        checked_seconds("max_age_seconds", self.max_age_seconds).unwrap_or(TimeDelta::MAX)
    }

    /// Returns the tolerated clock skew.
    #[must_use]
    pub fn clock_skew(&self) -> TimeDelta {
        checked_seconds("clock_skew_seconds", self.clock_skew_seconds).unwrap_or(TimeDelta::MAX)
    }

    /// Returns the required headers, lowercased.
    #[must_use]
    pub fn required_headers(&self) -> Vec<String> {
        self.required_headers
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_ascii_lowercase)
            .collect()
    }
}
