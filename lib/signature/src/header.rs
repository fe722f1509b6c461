//! Parsing of the `Signature` header parameters.

use crate::error::SignatureError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rootcause::prelude::Report;

/// The parameters of a draft-cavage `Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignatureParams {
    pub key_id: String,
    pub algorithm: Option<String>,
    pub headers: Vec<String>,
    pub signature: Vec<u8>,
    pub created: Option<i64>,
    pub expires: Option<i64>,
}

impl SignatureParams {
    /// Parses `keyId="...",algorithm="...",headers="...",signature="..."`.
    ///
    /// Unknown parameters are ignored. `headers` defaults to `date`.
    pub(crate) fn parse(value: &str) -> Result<Self, Report<SignatureError>> {
        let mut key_id = None;
        let mut algorithm = None;
        let mut headers = None;
        let mut signature = None;
        let mut created = None;
        let mut expires = None;

        for (name, raw) in split_params(value)? {
            match name.to_ascii_lowercase().as_str() {
                "keyid" => key_id = Some(raw.to_string()),
                "algorithm" => algorithm = Some(raw.to_ascii_lowercase()),
                "headers" => {
                    headers = Some(
                        raw.split_ascii_whitespace()
                            .map(str::to_ascii_lowercase)
                            .collect::<Vec<_>>(),
                    );
                }
                "signature" => {
                    let bytes = STANDARD.decode(raw).map_err(|e| SignatureError::Malformed {
                        details: format!("signature is not base64: {e}"),
                    })?;
                    signature = Some(bytes);
                }
                "created" => created = Some(parse_timestamp("created", raw)?),
                "expires" => expires = Some(parse_timestamp("expires", raw)?),
                _ => {}
            }
        }

        let key_id = key_id.filter(|k| !k.is_empty()).ok_or_else(|| malformed("missing keyId"))?;
        let signature = signature.ok_or_else(|| malformed("missing signature"))?;

        Ok(Self {
            key_id,
            algorithm,
            headers: headers.unwrap_or_else(|| vec!["date".to_string()]),
            signature,
            created,
            expires,
        })
    }
}

fn malformed(details: &str) -> Report<SignatureError> {
    SignatureError::Malformed {
        details: details.to_string(),
    }
    .into()
}

fn parse_timestamp(name: &str, raw: &str) -> Result<i64, Report<SignatureError>> {
    raw.parse::<i64>().map_err(|_| {
        SignatureError::Malformed {
            details: format!("{name} is not a unix timestamp: '{raw}'"),
        }
        .into()
    })
}

/// Splits `a="x",b=1` into name/value pairs, honoring quotes.
fn split_params(value: &str) -> Result<Vec<(&str, &str)>, Report<SignatureError>> {
    let mut params = Vec::new();
    let mut rest = value.trim();

    while !rest.is_empty() {
        let (name, after_name) = rest
            .split_once('=')
            .ok_or_else(|| malformed("expected name=value"))?;
        let name = name.trim();
        let after_name = after_name.trim_start();

        let (raw, after_value) = if let Some(quoted) = after_name.strip_prefix('"') {
            let end = quoted
                .find('"')
                .ok_or_else(|| malformed("unterminated quoted value"))?;
            (&quoted[..end], &quoted[end + 1..])
        } else {
            let end = after_name.find(',').unwrap_or(after_name.len());
            (after_name[..end].trim(), &after_name[end..])
        };

        params.push((name, raw));

        let after_value = after_value.trim_start();
        rest = match after_value.strip_prefix(',') {
            Some(next) => next.trim_start(),
            None if after_value.is_empty() => "",
            None => return Err(malformed("expected ',' between parameters")),
        };
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mastodon_style_header() {
        let params = SignatureParams::parse(
            r#"keyId="https://remote.example/users/ada#main-key",algorithm="rsa-sha256",headers="(request-target) host date",signature="c2lnbmVk""#,
        )
        .expect("parse");

        assert_eq!(params.key_id, "https://remote.example/users/ada#main-key");
        assert_eq!(params.algorithm.as_deref(), Some("rsa-sha256"));
        assert_eq!(params.headers, vec!["(request-target)", "host", "date"]);
        assert_eq!(params.signature, b"signed");
        assert_eq!(params.created, None);
    }

    #[test]
    fn parses_unquoted_timestamps_and_spacing() {
        let params = SignatureParams::parse(
            r#"keyId="k", created=1402170695, expires=1402170995 , signature="c2lnbmVk""#,
        )
        .expect("parse");

        assert_eq!(params.created, Some(1_402_170_695));
        assert_eq!(params.expires, Some(1_402_170_995));
        assert_eq!(params.headers, vec!["date"]);
        assert!(params.algorithm.is_none());
    }

    #[test]
    fn requires_key_id_and_signature() {
        assert!(SignatureParams::parse(r#"signature="c2lnbmVk""#).is_err());
        assert!(SignatureParams::parse(r#"keyId="k""#).is_err());
        assert!(SignatureParams::parse(r#"keyId="",signature="c2lnbmVk""#).is_err());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(SignatureParams::parse(r#"keyId="k,signature="c2lnbmVk""#).is_err());
        assert!(SignatureParams::parse(r#"keyId="k" signature="c2lnbmVk""#).is_err());
        assert!(SignatureParams::parse(r#"keyId="k",signature="not base64!""#).is_err());
        assert!(SignatureParams::parse(r#"keyId="k",created=yesterday,signature="c2lnbmVk""#).is_err());
    }
}
