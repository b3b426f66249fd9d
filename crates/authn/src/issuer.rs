//! Access token issuance.
//!
//! The issuer turns an authenticated [`Channel`] into a signed compact JWS
//! with a fixed 300-second lifetime, and optionally an opaque refresh token.
//! Signing failures are returned to the caller as-is and never retried.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use fail::fail_point;
use oauth_channel_storage::Channel;
use uuid::Uuid;

use crate::{
    claims::{ACCESS_TOKEN_TTL, TokenClaims},
    config::AuthConfig,
    error::SigningError,
    keys::SigningKeys,
};

/// Result of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Signed access token (compact JWS).
    pub access_token: String,
    /// Opaque refresh token, if requested.
    pub refresh_token: Option<String>,
    /// Issuance instant in the service timezone.
    pub issued_at: DateTime<FixedOffset>,
    /// Expiry instant in the service timezone; always `issued_at + 300s`.
    pub expires_at: DateTime<FixedOffset>,
}

/// Signs access tokens for authenticated channels.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: SigningKeys,
    issuer: String,
    timezone: FixedOffset,
}

impl TokenIssuer {
    /// Creates an issuer from loaded keys and the service configuration.
    #[must_use]
    pub fn new(keys: SigningKeys, config: &AuthConfig) -> Self {
        Self { keys, issuer: config.issuer().to_owned(), timezone: config.timezone() }
    }

    /// Issues a token for `channel` at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::Signing`] if the claims cannot be signed.
    pub fn issue(
        &self,
        channel: &Channel,
        device_id: &str,
        want_refresh: bool,
    ) -> Result<IssuedToken, SigningError> {
        self.issue_at(channel, device_id, want_refresh, Utc::now())
    }

    /// Issues a token for `channel` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::Signing`] if the claims cannot be signed.
    #[tracing::instrument(skip(self, channel, now), fields(client_id = %channel.client_id))]
    pub fn issue_at<Tz: TimeZone>(
        &self,
        channel: &Channel,
        device_id: &str,
        want_refresh: bool,
        now: DateTime<Tz>,
    ) -> Result<IssuedToken, SigningError> {
        let issued_at = now.with_timezone(&self.timezone);
        let claims = TokenClaims::for_channel(channel, device_id, &self.issuer, &issued_at);

        fail_point!("issuer-before-sign", |_| {
            Err(SigningError::Signing(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into()))
        });

        let access_token =
            jsonwebtoken::encode(&self.keys.header(), &claims, self.keys.encoding_key())
                .map_err(SigningError::Signing)?;

        let refresh_token = want_refresh.then(|| refresh_token_for(&access_token));

        tracing::debug!(
            sub = %claims.sub,
            exp = claims.exp,
            refresh = want_refresh,
            "Access token issued"
        );

        Ok(IssuedToken {
            access_token,
            refresh_token,
            expires_at: issued_at + ACCESS_TOKEN_TTL,
            issued_at,
        })
    }

    /// Returns the issuer string written to `iss`.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

/// Opaque refresh token bound to an access token.
///
/// UUID v5 of the access token in a random namespace, base64url-encoded
/// without padding and upper-cased. Carries no claims.
fn refresh_token_for(access_token: &str) -> String {
    let derived = Uuid::new_v5(&Uuid::new_v4(), access_token.as_bytes()).to_string();
    URL_SAFE_NO_PAD.encode(derived.as_bytes()).to_ascii_uppercase()
}
