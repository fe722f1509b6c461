//! Keys and a request signer shared by this crate's tests.

use crate::header::SignatureParams;
use crate::verifier::signing_string;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, TimeZone, Utc};
use ed25519_dalek::{Signer, SigningKey};
use http::request::Parts;
use http::{HeaderValue, Request};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

pub const ACTOR: &str = "https://remote.example/users/ada";
pub const KEY_ID: &str = "https://remote.example/users/ada#main-key";

/// The instant every test request is signed at.
pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

/// A 1024-bit key pair, generated once per test binary.
pub fn rsa_key_pair() -> (RsaPrivateKey, RsaPublicKey) {
    static PAIR: OnceLock<(RsaPrivateKey, RsaPublicKey)> = OnceLock::new();
    PAIR.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("generate key");
        let public = RsaPublicKey::from(&private);
        (private, public)
    })
    .clone()
}

/// Describes a request to be signed.
pub struct SignedRequest {
    host: String,
    algorithm: Option<String>,
    headers: Vec<String>,
    expires: Option<i64>,
}

impl SignedRequest {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            algorithm: None,
            headers: vec![
                "(request-target)".to_string(),
                "host".to_string(),
                "date".to_string(),
            ],
            expires: None,
        }
    }

    pub fn algorithm(mut self, algorithm: &str) -> Self {
        self.algorithm = Some(algorithm.to_string());
        self
    }

    pub fn headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|h| (*h).to_string()).collect();
        self
    }

    pub fn expires(mut self, expires: i64) -> Self {
        self.expires = Some(expires);
        self
    }

    fn sign_with(self, default_algorithm: &str, sign: impl FnOnce(&[u8]) -> Vec<u8>) -> Parts {
        let (mut parts, ()) = Request::post("/users/ada/inbox")
            .header(http::header::HOST, self.host.as_str())
            .header(
                http::header::DATE,
                at().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            )
            .body(())
            .expect("request")
            .into_parts();

        let algorithm = self.algorithm.unwrap_or_else(|| default_algorithm.to_string());
        let mut params = SignatureParams {
            key_id: KEY_ID.to_string(),
            algorithm: Some(algorithm.clone()),
            headers: self.headers,
            signature: Vec::new(),
            created: None,
            expires: self.expires,
        };
        if params.expires.is_some() && !params.headers.iter().any(|h| h == "(expires)") {
            params.headers.push("(expires)".to_string());
        }

        let message = signing_string(&parts, &params).expect("signing string");
        let signature = STANDARD.encode(sign(message.as_bytes()));

        let mut value = format!(
            r#"keyId="{KEY_ID}",algorithm="{algorithm}",headers="{}",signature="{signature}""#,
            params.headers.join(" ")
        );
        if let Some(expires) = params.expires {
            value.push_str(&format!(",expires={expires}"));
        }

        parts.headers.insert(
            "signature",
            HeaderValue::from_str(&value).expect("header value"),
        );
        parts
    }
}

pub fn sign_ed25519(request: SignedRequest) -> Parts {
    let key = signing_key();
    request.sign_with("ed25519", |message| key.sign(message).to_bytes().to_vec())
}

pub fn sign_rsa(request: SignedRequest, key: &RsaPrivateKey, algorithm: &str) -> Parts {
    request
        .algorithm(algorithm)
        .sign_with("rsa-sha256", |message| {
            key.sign(Pkcs1v15Sign::new::<Sha256>(), &Sha256::digest(message))
                .expect("rsa sign")
        })
}
