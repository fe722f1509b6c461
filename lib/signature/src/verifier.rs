//! Verification of draft-cavage HTTP signatures.

use crate::config::SignatureConfig;
use crate::error::SignatureError;
use crate::header::SignatureParams;
use crate::key::{PublicKey, PublicKeyResolver};
use crate::signature::{Signature, actor_of};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use http::HeaderMap;
use http::header::{AUTHORIZATION, DATE};
use http::request::Parts;
use rootcause::prelude::Report;
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, instrument};

const SIGNATURE_HEADER: &str = "signature";
const DIGEST_HEADER: &str = "digest";

/// Verifies the HTTP signature on an incoming request.
#[derive(Clone)]
pub struct HttpSignatureVerifier {
    keys: Arc<dyn PublicKeyResolver>,
    config: SignatureConfig,
}

impl HttpSignatureVerifier {
    /// Creates a verifier that fetches signer keys from `keys`.
    #[must_use]
    pub fn new(keys: Arc<dyn PublicKeyResolver>, config: SignatureConfig) -> Self {
        Self { keys, config }
    }

    /// Verifies the request against the current time.
    ///
    /// # Errors
    ///
    /// Returns a `SignatureError` describing the first check that failed.
    pub async fn verify(&self, parts: &Parts) -> Result<Signature, Report<SignatureError>> {
        self.verify_at(parts, Utc::now()).await
    }

    /// Verifies the request as of `now`.
    ///
    /// # Errors
    ///
    /// Returns a `SignatureError` describing the first check that failed.
    #[instrument(skip(self, parts), fields(method = %parts.method, uri = %parts.uri))]
    pub async fn verify_at(
        &self,
        parts: &Parts,
        now: DateTime<Utc>,
    ) -> Result<Signature, Report<SignatureError>> {
        let raw = signature_header(&parts.headers)?;
        let params = SignatureParams::parse(raw)?;

        if let Some(algorithm) = &params.algorithm {
            if !matches!(algorithm.as_str(), "hs2019" | "rsa-sha256" | "ed25519") {
                return Err(SignatureError::UnsupportedAlgorithm {
                    algorithm: algorithm.clone(),
                }
                .into());
            }
        }

        for required in self.config.required_headers() {
            if !params.headers.contains(&required) {
                return Err(SignatureError::MissingSignedHeader { header: required }.into());
            }
        }

        let expires = self.expiry(&params, &parts.headers, now)?;
        let signing_string = signing_string(parts, &params)?;

        let key = self.keys.resolve(actor_of(&params.key_id)).await?;

        let algorithm = verify_bytes(
            &key,
            params.algorithm.as_deref(),
            signing_string.as_bytes(),
            &params.signature,
        )?;
        debug!(key_id = %params.key_id, algorithm, "signature verified");

        Ok(Signature::new(
            params.key_id,
            algorithm.to_string(),
            params.headers,
            params.signature,
            expires,
        ))
    }

    fn expiry(
        &self,
        params: &SignatureParams,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, Report<SignatureError>> {
        let signed_at = match params.created {
            Some(created) => Some(timestamp("created", created)?),
            None => headers
                .get(DATE)
                .map(|value| {
                    value
                        .to_str()
                        .ok()
                        .and_then(|date| DateTime::parse_from_rfc2822(date).ok())
                        .map(|date| date.with_timezone(&Utc))
                        .ok_or_else(|| {
                            Report::from(SignatureError::Malformed {
                                details: "unparseable Date header".to_string(),
                            })
                        })
                })
                .transpose()?,
        };

        if let Some(signed_at) = signed_at {
            let latest = now
                .checked_add_signed(self.config.clock_skew())
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            if signed_at > latest {
                return Err(SignatureError::Expired {
                    details: format!("signed in the future at {signed_at}"),
                }
                .into());
            }
        }

        let expires = match (params.expires, signed_at) {
            (Some(expires), _) => timestamp("expires", expires)?,
            (None, Some(signed_at)) => signed_at
                .checked_add_signed(self.config.max_age())
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            (None, None) => {
                return Err(SignatureError::Expired {
                    details: "no Date header or created parameter".to_string(),
                }
                .into());
            }
        };

        if expires < now {
            return Err(SignatureError::Expired {
                details: format!("expired at {expires}"),
            }
            .into());
        }

        Ok(expires)
    }
}

fn signature_header(headers: &HeaderMap) -> Result<&str, Report<SignatureError>> {
    if let Some(value) = headers.get(SIGNATURE_HEADER) {
        return value.to_str().map_err(|_| {
            SignatureError::Malformed {
                details: "Signature header is not ASCII".to_string(),
            }
            .into()
        });
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Signature "))
        .ok_or_else(|| {
            SignatureError::MissingHeader {
                header: SIGNATURE_HEADER,
            }
            .into()
        })
}

fn timestamp(name: &str, seconds: i64) -> Result<DateTime<Utc>, Report<SignatureError>> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        SignatureError::Malformed {
            details: format!("{name} timestamp out of range"),
        }
        .into()
    })
}

/// Builds the string the signer signed, one `name: value` line per header.
pub(crate) fn signing_string(
    parts: &Parts,
    params: &SignatureParams,
) -> Result<String, Report<SignatureError>> {
    let mut lines = Vec::with_capacity(params.headers.len());

    for name in &params.headers {
        let value = match name.as_str() {
            "(request-target)" => format!(
                "{} {}",
                parts.method.as_str().to_ascii_lowercase(),
                parts
                    .uri
                    .path_and_query()
                    .map_or("/", http::uri::PathAndQuery::as_str)
            ),
            "(created)" => params
                .created
                .ok_or_else(|| missing_signed(name))?
                .to_string(),
            "(expires)" => params
                .expires
                .ok_or_else(|| missing_signed(name))?
                .to_string(),
            header => {
                let values = parts
                    .headers
                    .get_all(header)
                    .iter()
                    .map(|value| value.to_str().map(str::trim))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| SignatureError::Malformed {
                        details: format!("header '{header}' is not ASCII"),
                    })?;
                if values.is_empty() {
                    return Err(missing_signed(name));
                }
                values.join(", ")
            }
        };
        lines.push(format!("{name}: {value}"));
    }

    Ok(lines.join("\n"))
}

fn missing_signed(name: &str) -> Report<SignatureError> {
    SignatureError::MissingSignedHeader {
        header: name.to_string(),
    }
    .into()
}

/// Checks `signature` over `message`, returning the algorithm that matched.
///
/// `hs2019` and an absent algorithm defer to the key type.
fn verify_bytes(
    key: &PublicKey,
    declared: Option<&str>,
    message: &[u8],
    signature: &[u8],
) -> Result<&'static str, Report<SignatureError>> {
    match (declared, key) {
        (None | Some("hs2019" | "rsa-sha256"), PublicKey::Rsa(key)) => {
            let hashed = Sha256::digest(message);
            key.verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
                .map_err(|_| SignatureError::InvalidSignature)?;
            Ok("rsa-sha256")
        }
        (None | Some("hs2019" | "ed25519"), PublicKey::Ed25519(key)) => {
            let signature = ed25519_dalek::Signature::from_slice(signature)
                .map_err(|_| SignatureError::InvalidSignature)?;
            key.verify_strict(message, &signature)
                .map_err(|_| SignatureError::InvalidSignature)?;
            Ok("ed25519")
        }
        (Some(declared), key) => Err(SignatureError::UnsupportedAlgorithm {
            algorithm: format!("{declared} with {} key", key.algorithm()),
        }
        .into()),
    }
}

/// Checks a `Digest: SHA-256=<base64>` header against a request body.
///
/// # Errors
///
/// Returns `MissingHeader` without a `Digest` header, `UnsupportedAlgorithm`
/// if it carries no SHA-256 entry, and `DigestMismatch` if the body differs.
pub fn verify_digest(headers: &HeaderMap, body: &[u8]) -> Result<(), Report<SignatureError>> {
    let value = headers
        .get(DIGEST_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(SignatureError::MissingHeader {
            header: DIGEST_HEADER,
        })?;

    let expected = value
        .split(',')
        .filter_map(|entry| entry.trim().split_once('='))
        .find(|(algorithm, _)| algorithm.eq_ignore_ascii_case("sha-256"))
        .map(|(_, digest)| digest.trim())
        .ok_or_else(|| SignatureError::UnsupportedAlgorithm {
            algorithm: value.to_string(),
        })?;

    if STANDARD.encode(Sha256::digest(body)) == expected {
        Ok(())
    } else {
        Err(SignatureError::DigestMismatch.into())
    }
}
