//! Shared test utilities for authentication testing.
//!
//! Provides ready-made configurations (HMAC and Ed25519), PEM key
//! generation, raw JWT crafting for attack tests, and signature tampering.
//! Feature-gated behind `testutil` to keep it out of production builds.
//!
//! ```toml
//! [dev-dependencies]
//! oauth-channel-authn = { path = "../authn", features = ["testutil"] }
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::{
    SigningKey,
    pkcs8::{EncodePrivateKey, EncodePublicKey, KeypairBytes, spki::der::pem::LineEnding},
};
use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::config::{AuthConfig, SigningConfig};

/// Service name used by [`test_config`].
pub const TEST_SERVICE_NAME: &str = "go-oauth";

/// HMAC secret used by [`hmac_signing_config`].
pub const TEST_HMAC_SECRET: &str = "test-hmac-secret-with-enough-entropy";

/// Key id used by [`ed25519_config`].
pub const TEST_KEY_ID: &str = "test-key-1";

/// Generates a fresh Ed25519 key pair as PEM.
///
/// Returns `(private_pkcs8_pem, public_spki_pem)`. The private key is
/// wrapped in [`Zeroizing`].
///
/// # Panics
///
/// Panics if PEM encoding fails.
pub fn generate_ed25519_pem() -> (Zeroizing<String>, String) {
    let signing_key = SigningKey::generate(&mut OsRng);

    // PKCS#8 v1: the private key alone, without the optional public key field.
    let keypair = KeypairBytes { secret_key: signing_key.to_bytes(), public_key: None };
    let private_pem = keypair.to_pkcs8_pem(LineEnding::LF).expect("encode PKCS#8 PEM");
    let public_pem =
        signing_key.verifying_key().to_public_key_pem(LineEnding::LF).expect("encode SPKI PEM");

    (private_pem, public_pem)
}

/// `HS256` signing configuration with [`TEST_HMAC_SECRET`].
pub fn hmac_signing_config() -> SigningConfig {
    SigningConfig::builder()
        .algorithm("HS256")
        .key(TEST_HMAC_SECRET.to_owned())
        .build()
        .expect("valid HMAC signing config")
}

/// Service configuration using [`hmac_signing_config`], default issuer, UTC.
pub fn test_config() -> AuthConfig {
    AuthConfig::builder()
        .service_name(TEST_SERVICE_NAME)
        .signing(hmac_signing_config())
        .build()
        .expect("valid test config")
}

/// Service configuration signing with a freshly generated Ed25519 key and
/// [`TEST_KEY_ID`].
///
/// Every call generates a new key pair, so two configs never verify each
/// other's tokens.
pub fn ed25519_config() -> AuthConfig {
    let (private_pem, public_pem) = generate_ed25519_pem();
    let signing = SigningConfig::builder()
        .algorithm("EdDSA")
        .key(private_pem.to_string())
        .verifying_key(public_pem)
        .key_id(TEST_KEY_ID)
        .build()
        .expect("valid Ed25519 signing config");

    AuthConfig::builder()
        .service_name(TEST_SERVICE_NAME)
        .signing(signing)
        .build()
        .expect("valid test config")
}

/// Creates a raw JWT string from arbitrary header and payload JSON.
///
/// The result has the shape `{header_b64}.{payload_b64}.` with an empty
/// signature, for testing rejection of `alg: none`, algorithm confusion and
/// similar crafted tokens.
///
/// # Panics
///
/// Panics if JSON serialization fails.
pub fn craft_raw_jwt(header_json: &serde_json::Value, payload_json: &serde_json::Value) -> String {
    let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(header_json).expect("header json"));
    let payload_b64 =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload_json).expect("payload json"));
    format!("{header_b64}.{payload_b64}.")
}

/// Flips the first character of the signature segment.
///
/// Changing the first character always alters the decoded bytes, unlike the
/// last one whose low bits may be padding.
///
/// # Panics
///
/// Panics if `token` has no non-empty signature segment.
pub fn tamper_signature(token: &str) -> String {
    let (signed, signature) = token.rsplit_once('.').expect("token has a signature segment");
    let mut chars = signature.chars();
    let first = chars.next().expect("signature is not empty");
    let replacement = if first == 'A' { 'B' } else { 'A' };
    format!("{signed}.{replacement}{}", chars.as_str())
}

/// Asserts that a `Result<T, AuthError>` is an `Err` of the given variant.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use oauth_channel_authn::assert_auth_error;
/// use oauth_channel_authn::error::AuthError;
///
/// let result: Result<(), AuthError> = Err(AuthError::TokenExpired);
/// assert_auth_error!(result, TokenExpired);
/// ```
#[macro_export]
macro_rules! assert_auth_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::error::AuthError::$variant { .. })),
            "expected AuthError::{}, got: {:?}",
            stringify!($variant),
            $result,
        );
    };
    ($result:expr, $variant:ident, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::AuthError::$variant { .. })),
            "{}: expected AuthError::{}, got: {:?}",
            $msg,
            stringify!($variant),
            $result,
        );
    };
}
