//! Fuzz target for access token verification.
//!
//! Feeds arbitrary byte strings to [`TokenVerifier::verify`] and the
//! algorithm resolver. Every input must produce `Ok` or a classified error,
//! never a panic.

#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;
use oauth_channel_authn::{
    AuthConfig, SigningConfig, TokenVerifier, algorithm::resolve_algorithm, keys::SigningKeys,
};

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

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    let _ = VERIFIER.verify(token);

    // The first segment doubles as an algorithm name.
    if let Some(first) = token.split('.').next() {
        let _ = resolve_algorithm(first);
    }
});
