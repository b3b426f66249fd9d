//! Access token verification.
//!
//! [`TokenVerifier::verify`] either returns the full [`TokenClaims`] or
//! exactly one [`TokenError`]. The checks run in this order:
//!
//! 1. The header must decode and its `alg` must equal the configured algorithm
//! 2. If a key id is configured, the header `kid` must equal it
//! 3. Signature, expiry (zero leeway) and issuer are validated together by `jsonwebtoken`
//!
//! # Example
//!
//! ```
//! use oauth_channel_authn::{
//!     config::{AuthConfig, SigningConfig},
//!     error::TokenError,
//!     keys::SigningKeys,
//!     verifier::TokenVerifier,
//! };
//!
//! let signing = SigningConfig::builder().algorithm("HS256").key("hmac-secret".to_owned()).build()?;
//! let config = AuthConfig::builder().service_name("go-oauth").signing(signing).build()?;
//! let verifier = TokenVerifier::new(SigningKeys::load(config.signing())?, &config);
//!
//! assert_eq!(verifier.verify("not-a-token"), Err(TokenError::TokenMalformed));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use jsonwebtoken::{Validation, decode, decode_header, errors::ErrorKind};

use crate::{claims::TokenClaims, config::AuthConfig, error::TokenError, keys::SigningKeys};

/// Claims every accepted token must carry.
const REQUIRED_CLAIMS: &[&str] = &["exp", "iss", "sub"];

/// Validates presented access tokens.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: SigningKeys,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier for tokens signed with `keys` by the configured issuer.
    #[must_use]
    pub fn new(keys: SigningKeys, config: &AuthConfig) -> Self {
        let mut validation = Validation::new(keys.algorithm());
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_issuer(&[config.issuer()]);
        validation.set_required_spec_claims(REQUIRED_CLAIMS);

        Self { keys, validation }
    }

    /// Verifies `token` and returns its claims.
    ///
    /// # Errors
    ///
    /// - [`TokenError::TokenMalformed`] if the token is not a decodable JWS
    /// - [`TokenError::InvalidSignature`] if the signature does not verify
    /// - [`TokenError::TokenExpired`] if `exp` has passed
    /// - [`TokenError::InvalidIssuer`] if `iss` is not the service issuer
    /// - [`TokenError::InvalidAccessToken`] for algorithm or key id mismatches and missing or
    ///   mistyped claims
    #[tracing::instrument(skip_all)]
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let header = decode_header(token).map_err(|e| classify(e.kind()))?;

        if header.alg != self.keys.algorithm() {
            tracing::debug!(alg = ?header.alg, "Token algorithm does not match configuration");
            return Err(TokenError::InvalidAccessToken);
        }

        if let Some(expected) = self.keys.key_id()
            && header.kid.as_deref() != Some(expected)
        {
            tracing::debug!(kid = ?header.kid, "Token key id does not match configuration");
            return Err(TokenError::InvalidAccessToken);
        }

        // Registered claims are checked on the raw JSON; typed parsing comes after.
        let data = decode::<serde_json::Value>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| classify(e.kind()))?;

        serde_json::from_value(data.claims).map_err(|e| {
            tracing::debug!(error = %e, "Verified token carries unexpected claims");
            TokenError::InvalidAccessToken
        })
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            TokenError::TokenMalformed
        },
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
        _ => TokenError::InvalidAccessToken,
    }
}
