//! Client-credentials authentication flow.
//!
//! A token request moves through the stages of [`FlowStage`]:
//!
//! ```text
//! Start → ChannelLookup → SecretCheck → GrantCheck → Issue → Done
//! ```
//!
//! Any stage can fail. Failures are logged with the stage they happened in
//! and returned as a single [`AuthError`]; nothing is retried. Verification
//! requests skip the store entirely and go straight to the
//! [`TokenVerifier`].

use std::{fmt, sync::Arc};

use oauth_channel_storage::{ChannelStore, GrantType, StorageError};
use subtle::ConstantTimeEq;
use tokio_util::sync::CancellationToken;

use crate::{
    config::AuthConfig,
    error::{AuthError, Result, SigningError},
    issuer::TokenIssuer,
    keys::SigningKeys,
    model::{BEARER, DeviceId, TokenRequest, TokenResponse, TokenVerification, TokenVerifyRequest},
    verifier::TokenVerifier,
};

/// Message returned with an issued token.
pub const REQUEST_TOKEN_SUCCESS: &str = "Request Token Successfully";

/// Reason given when the presented secret does not match.
pub const REQUEST_TOKEN_FAILED: &str = "Request Token Failed!";

/// Message returned with a successful verification.
pub const VERIFY_TOKEN_SUCCESS: &str = "Verify Token Successfully";

/// Reason given when the channel may not use the requested grant.
pub const GRANT_NOT_ALLOWED: &str = "grant not allowed";

/// Stage of a token request, recorded on every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStage {
    /// Request validation.
    Start,
    /// Store lookup by `client_id`.
    ChannelLookup,
    /// Constant-time secret comparison.
    SecretCheck,
    /// Grant-type eligibility.
    GrantCheck,
    /// Claims construction and signing.
    Issue,
    /// Token handed back to the caller.
    Done,
}

impl FlowStage {
    /// Stage name used in log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ChannelLookup => "channel_lookup",
            Self::SecretCheck => "secret_check",
            Self::GrantCheck => "grant_check",
            Self::Issue => "issue",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticates channels and issues or verifies their tokens.
///
/// Holds only immutable configuration and a shared store handle, so one
/// instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct AuthenticationFlow {
    store: Arc<dyn ChannelStore>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl AuthenticationFlow {
    /// Loads signing keys and builds the flow.
    ///
    /// # Errors
    ///
    /// Returns a [`SigningError`] if the configured algorithm or keys are
    /// unusable. The service should refuse to start in that case.
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn ChannelStore>,
    ) -> std::result::Result<Self, SigningError> {
        let keys = SigningKeys::load(config.signing())?;
        Ok(Self {
            store,
            issuer: TokenIssuer::new(keys.clone(), config),
            verifier: TokenVerifier::new(keys, config),
        })
    }

    /// Returns the token issuer.
    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Returns the token verifier.
    #[must_use]
    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Authenticates a client-credentials request and issues an access token.
    ///
    /// The store lookup races `cancel`; a cancelled request fails
    /// immediately with an internal error.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidPayload`] if a request field is blank
    /// - [`AuthError::ChannelNotFound`] if no channel has this `client_id`
    /// - [`AuthError::Unauthorized`] on a secret mismatch or an ineligible grant type
    /// - [`AuthError::Internal`] on store failure, cancellation or signing failure
    #[tracing::instrument(
        skip(self, request, device_id, cancel),
        fields(client_id = %request.client_id, device_id = %device_id)
    )]
    pub async fn request_token(
        &self,
        request: &TokenRequest,
        device_id: &DeviceId,
        cancel: &CancellationToken,
    ) -> Result<TokenResponse> {
        request.validate().map_err(|e| reject(FlowStage::Start, e))?;

        let lookup = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(StorageError::cancelled()),
            result = self.store.find_one(&request.client_id) => result,
        };
        let channel = lookup.map_err(|e| reject(FlowStage::ChannelLookup, e.into()))?;

        let secret_matches: bool =
            channel.secret_key.as_bytes().ct_eq(request.client_secret.as_bytes()).into();
        if !secret_matches {
            return Err(reject(FlowStage::SecretCheck, AuthError::unauthorized(REQUEST_TOKEN_FAILED)));
        }

        let requested = request.grant_type.parse::<GrantType>().ok();
        if channel.primary_grant_type() != Some(GrantType::ClientCredentials)
            || requested != Some(GrantType::ClientCredentials)
        {
            return Err(reject(FlowStage::GrantCheck, AuthError::unauthorized(GRANT_NOT_ALLOWED)));
        }

        let issued = self
            .issuer
            .issue(&channel, device_id.as_str(), false)
            .map_err(|e| reject(FlowStage::Issue, e.into()))?;

        tracing::debug!(stage = %FlowStage::Done, expires_at = %issued.expires_at, "Token issued");

        Ok(TokenResponse {
            token_type: BEARER.to_owned(),
            expired_at: issued.expires_at,
            token: issued.access_token,
            refresh_token: issued.refresh_token,
        })
    }

    /// Verifies a token presented on behalf of `request.client_id`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidParameter`] if the client id or token is empty
    /// - [`AuthError::TokenExpired`] if the token has expired
    /// - [`AuthError::Unauthorized`] for every other verification failure, including a token
    ///   issued to a different client
    #[tracing::instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub fn verify_token(&self, request: &TokenVerifyRequest) -> Result<TokenVerification> {
        if request.client_id.trim().is_empty() || request.token.trim().is_empty() {
            return Err(AuthError::invalid_parameter("client_id or token can't be empty"));
        }

        let claims = self.verifier.verify(&request.token).map_err(|e| {
            tracing::warn!(reason = %e, "Token verification failed");
            AuthError::from(e)
        })?;

        if claims.client_id != request.client_id {
            tracing::warn!(token_client_id = %claims.client_id, "Token presented by another client");
            return Err(AuthError::unauthorized("token was not issued to this client"));
        }

        Ok(TokenVerification { client_id: claims.client_id, scopes: claims.scopes })
    }
}

impl fmt::Debug for AuthenticationFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationFlow")
            .field("issuer", &self.issuer)
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

/// Logs a failed stage and passes the error through.
fn reject(stage: FlowStage, err: AuthError) -> AuthError {
    match &err {
        AuthError::Internal { .. } => {
            tracing::error!(stage = %stage, error = ?err, "Token request failed");
        },
        _ => {
            tracing::warn!(
                stage = %stage,
                status = %err.status(),
                reason = %err,
                "Token request rejected"
            );
        },
    }
    err
}
