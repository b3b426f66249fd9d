//! Security-focused verification tests.
//!
//! These tests verify the token path's resistance to common JWT attack
//! vectors: algorithm substitution, algorithm confusion between families,
//! forged claims, expired tokens, foreign issuers, cross-client replay and
//! malformed JWT structures.
#![allow(clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use oauth_channel_authn::{
    AuthConfig, AuthenticationFlow, FORBIDDEN_ALGORITHMS, SigningConfig, Status, TokenError,
    assert_auth_error,
    keys::SigningKeys,
    model::TokenVerifyRequest,
    testutil::{
        TEST_HMAC_SECRET, TEST_KEY_ID, craft_raw_jwt, ed25519_config, tamper_signature,
        test_config,
    },
    verifier::TokenVerifier,
};
use oauth_channel_storage::{MemoryChannelStore, testutil::sample_channel};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CLIENT_ID: &str = "5e1f0c9b2a3d4e5f";
const ISSUER: &str = "https://oauth.github.com";

fn verifier_for(config: &AuthConfig) -> TokenVerifier {
    TokenVerifier::new(SigningKeys::load(config.signing()).expect("load keys"), config)
}

fn flow_for(config: &AuthConfig) -> AuthenticationFlow {
    AuthenticationFlow::new(config, Arc::new(MemoryChannelStore::new())).expect("build flow")
}

/// Claims that would be accepted if correctly signed.
fn valid_claims(client_id: &str) -> serde_json::Value {
    let now = Utc::now().timestamp();
    json!({
        "sub": "7a8b9c0d-0000-4000-8000-000000000000",
        "aud": "https://app.example.com",
        "iss": ISSUER,
        "iat": now,
        "exp": now + 300,
        "clientId": client_id,
        "scopes": ["read", "write", "admin"],
        "isPublic": false,
        "isActive": true,
        "deviceId": "device-1",
    })
}

fn hs256_token(secret: &str, claims: &serde_json::Value) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encode HS256 token")
}

// ---------------------------------------------------------------------------
// Algorithm substitution
// ---------------------------------------------------------------------------

#[test]
fn test_algorithm_none_rejected_without_signature_check() {
    let verifier = verifier_for(&test_config());
    let token = craft_raw_jwt(&json!({"alg": "none", "typ": "JWT"}), &valid_claims(CLIENT_ID));

    let result = verifier.verify(&token);
    assert!(result.is_err(), "alg=none must never verify");
}

#[test]
fn test_all_forbidden_algorithms_rejected_at_configuration() {
    for alg in FORBIDDEN_ALGORITHMS {
        let signing = SigningConfig::builder()
            .algorithm(*alg)
            .key("secret".to_owned())
            .build()
            .expect("config accepts any non-blank identifier");
        assert!(SigningKeys::load(&signing).is_err(), "algorithm '{alg}' must not load");
    }
}

#[test]
fn test_hmac_token_rejected_by_ed25519_verifier() {
    // Classic confusion: sign with HS256 using public material as the secret.
    let config = ed25519_config();
    let public_pem = config.signing().verifying_key().expect("verifying key").to_owned();
    let verifier = verifier_for(&config);

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(TEST_KEY_ID.to_owned());
    let token = jsonwebtoken::encode(
        &header,
        &valid_claims(CLIENT_ID),
        &EncodingKey::from_secret(public_pem.as_bytes()),
    )
    .expect("encode");

    assert_eq!(verifier.verify(&token), Err(TokenError::InvalidAccessToken));
}

#[test]
fn test_hs512_token_rejected_by_hs256_verifier() {
    let verifier = verifier_for(&test_config());
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS512),
        &valid_claims(CLIENT_ID),
        &EncodingKey::from_secret(TEST_HMAC_SECRET.as_bytes()),
    )
    .expect("encode");

    assert_eq!(verifier.verify(&token), Err(TokenError::InvalidAccessToken));
}

// ---------------------------------------------------------------------------
// Forgery
// ---------------------------------------------------------------------------

#[test]
fn test_token_signed_with_wrong_secret() {
    let verifier = verifier_for(&test_config());
    let token = hs256_token("guessed-secret", &valid_claims(CLIENT_ID));

    assert_eq!(verifier.verify(&token), Err(TokenError::InvalidSignature));
}

#[test]
fn test_payload_swap_keeps_original_signature() {
    let config = test_config();
    let verifier = verifier_for(&config);
    let genuine = hs256_token(TEST_HMAC_SECRET, &valid_claims(CLIENT_ID));

    // Replace the payload with an escalated one while keeping the signature.
    let mut escalated = valid_claims(CLIENT_ID);
    escalated["scopes"] = json!(["admin", "superuser"]);
    let forged_payload =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&escalated).expect("serialize claims"));
    let parts: Vec<&str> = genuine.split('.').collect();
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert_eq!(verifier.verify(&forged), Err(TokenError::InvalidSignature));
}

#[test]
fn test_tampered_signature_never_yields_claims() {
    let verifier = verifier_for(&test_config());
    let token = hs256_token(TEST_HMAC_SECRET, &valid_claims(CLIENT_ID));

    let result = verifier.verify(&tamper_signature(&token));
    assert!(
        matches!(result, Err(TokenError::InvalidSignature | TokenError::InvalidAccessToken)),
        "expected a signature failure, got {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Expiry and issuer
// ---------------------------------------------------------------------------

#[test]
fn test_token_expired_one_second_ago() {
    let verifier = verifier_for(&test_config());
    let mut claims = valid_claims(CLIENT_ID);
    claims["exp"] = json!(Utc::now().timestamp() - 1);

    assert_eq!(
        verifier.verify(&hs256_token(TEST_HMAC_SECRET, &claims)),
        Err(TokenError::TokenExpired)
    );
}

#[test]
fn test_token_valid_until_expiry() {
    let verifier = verifier_for(&test_config());
    let mut claims = valid_claims(CLIENT_ID);
    claims["exp"] = json!(Utc::now().timestamp() + 5);

    assert!(verifier.verify(&hs256_token(TEST_HMAC_SECRET, &claims)).is_ok());
}

#[test]
fn test_expiry_reported_even_for_old_issued_at() {
    let config = test_config();
    let flow = flow_for(&config);
    let channel = sample_channel("mobile-app", CLIENT_ID);

    let issued = flow
        .issuer()
        .issue_at(&channel, "device-1", false, Utc::now() - TimeDelta::hours(2))
        .expect("issue");

    let result = flow.verify_token(&TokenVerifyRequest::new(CLIENT_ID, issued.access_token));
    assert_auth_error!(result, TokenExpired);
}

#[test]
fn test_foreign_issuer_rejected() {
    let verifier = verifier_for(&test_config());
    let mut claims = valid_claims(CLIENT_ID);
    claims["iss"] = json!("https://accounts.example.com");

    assert_eq!(
        verifier.verify(&hs256_token(TEST_HMAC_SECRET, &claims)),
        Err(TokenError::InvalidIssuer)
    );
}

#[test]
fn test_missing_required_claim_rejected() {
    let verifier = verifier_for(&test_config());
    let mut claims = valid_claims(CLIENT_ID);
    claims.as_object_mut().expect("object").remove("exp");

    assert_eq!(
        verifier.verify(&hs256_token(TEST_HMAC_SECRET, &claims)),
        Err(TokenError::InvalidAccessToken)
    );
}

// ---------------------------------------------------------------------------
// Cross-client replay
// ---------------------------------------------------------------------------

#[test]
fn test_token_presented_by_other_client_is_unauthorized() {
    let config = test_config();
    let flow = flow_for(&config);
    let token = flow
        .issuer()
        .issue(&sample_channel("mobile-app", CLIENT_ID), "device-1", false)
        .expect("issue")
        .access_token;

    let err = flow
        .verify_token(&TokenVerifyRequest::new("ffffffffffffffff", token))
        .expect_err("token belongs to another client");
    assert_eq!(err.status(), Status::Unauthorized);
}

#[test]
fn test_verifier_errors_collapse_to_unauthorized_at_flow() {
    let flow = flow_for(&test_config());
    let forged = hs256_token("guessed-secret", &valid_claims(CLIENT_ID));

    let err =
        flow.verify_token(&TokenVerifyRequest::new(CLIENT_ID, forged)).expect_err("forged token");
    assert_eq!(err.status(), Status::Unauthorized);
    assert_eq!(err.status().http_status(), 401);
}

// ---------------------------------------------------------------------------
// Malformed structures
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_jwt_one_part() {
    let verifier = verifier_for(&test_config());
    assert_eq!(verifier.verify("eyJhbGciOiJIUzI1NiJ9"), Err(TokenError::TokenMalformed));
}

#[test]
fn test_malformed_jwt_extra_segments() {
    let verifier = verifier_for(&test_config());
    let token = hs256_token(TEST_HMAC_SECRET, &valid_claims(CLIENT_ID));

    let result = verifier.verify(&format!("{token}.extra"));
    assert!(result.is_err(), "four-segment token must not verify");
}

#[test]
fn test_malformed_jwt_payload_not_json() {
    let verifier = verifier_for(&test_config());
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(b"not json at all");
    let token = format!("{header}.{payload}.c2ln");

    let result = verifier.verify(&token);
    assert!(
        matches!(result, Err(TokenError::TokenMalformed | TokenError::InvalidSignature)),
        "got {result:?}"
    );
}

#[test]
fn test_malformed_jwt_header_garbage() {
    let verifier = verifier_for(&test_config());
    assert_eq!(verifier.verify("%%%.%%%.%%%"), Err(TokenError::TokenMalformed));
}
