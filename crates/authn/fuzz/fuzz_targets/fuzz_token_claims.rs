//! Structured fuzz target for token claims.
//!
//! Uses the `arbitrary` crate to generate JWT-shaped inputs with plausible
//! headers and channel claims, then runs them through the verifier. This
//! reaches the claim-typing and classification paths that raw bytes rarely
//! hit.

#![no_main]

use std::sync::LazyLock;

use arbitrary::Arbitrary;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use libfuzzer_sys::fuzz_target;
use oauth_channel_authn::{AuthConfig, SigningConfig, TokenVerifier, keys::SigningKeys};
use serde_json::{Map, Value, json};

static VERIFIER: LazyLock<TokenVerifier> = LazyLock::new(|| {
    let signing = SigningConfig::builder()
        .algorithm("HS256")
        .key("fuzz-hmac-secret".to_owned())
        .build()
        .expect("signing config");
    let config =
        AuthConfig::builder().service_name("fuzz").signing(signing).build().expect("config");
    TokenVerifier::new(SigningKeys::load(config.signing()).expect("keys"), &config)
});

#[derive(Debug, Arbitrary)]
struct FuzzedToken {
    alg: FuzzedAlg,
    kid: Option<String>,
    iss: Option<String>,
    sub: Option<String>,
    aud: String,
    exp: Option<u64>,
    iat: u64,
    client_id: Option<String>,
    scopes: Vec<String>,
    is_public: bool,
    is_active: bool,
    device_id: String,
    signature_bytes: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
enum FuzzedAlg {
    HS256,
    HS512,
    EdDSA,
    RS256,
    None,
    Other(String),
}

impl FuzzedAlg {
    fn as_str(&self) -> &str {
        match self {
            Self::HS256 => "HS256",
            Self::HS512 => "HS512",
            Self::EdDSA => "EdDSA",
            Self::RS256 => "RS256",
            Self::None => "none",
            Self::Other(s) => s,
        }
    }
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_owned(), value);
    }
}

fn build_token(input: &FuzzedToken) -> String {
    let mut header = Map::new();
    header.insert("alg".to_owned(), json!(input.alg.as_str()));
    header.insert("typ".to_owned(), json!("JWT"));
    insert_opt(&mut header, "kid", input.kid.as_ref().map(|k| json!(k)));

    let mut payload = Map::new();
    insert_opt(&mut payload, "iss", input.iss.as_ref().map(|v| json!(v)));
    insert_opt(&mut payload, "sub", input.sub.as_ref().map(|v| json!(v)));
    insert_opt(&mut payload, "exp", input.exp.map(|v| json!(v)));
    insert_opt(&mut payload, "clientId", input.client_id.as_ref().map(|v| json!(v)));
    payload.insert("aud".to_owned(), json!(input.aud));
    payload.insert("iat".to_owned(), json!(input.iat));
    payload.insert("scopes".to_owned(), json!(input.scopes));
    payload.insert("isPublic".to_owned(), json!(input.is_public));
    payload.insert("isActive".to_owned(), json!(input.is_active));
    payload.insert("deviceId".to_owned(), json!(input.device_id));

    let header_b64 =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Value::Object(header)).unwrap_or_default());
    let payload_b64 =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&Value::Object(payload)).unwrap_or_default());
    let sig_b64 = URL_SAFE_NO_PAD.encode(&input.signature_bytes);

    format!("{header_b64}.{payload_b64}.{sig_b64}")
}

fuzz_target!(|input: FuzzedToken| {
    let token = build_token(&input);

    // Random signatures must never verify.
    if let Ok(claims) = VERIFIER.verify(&token) {
        panic!("forged token accepted: {claims:?}");
    }
});
