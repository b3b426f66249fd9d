//! Authentication error types.
//!
//! Errors are layered the same way the components are:
//!
//! - [`TokenError`]: the closed set of verification failures
//! - [`SigningError`]: key loading and signing failures (startup-fatal)
//! - [`ConfigError`]: invalid configuration values
//! - [`AuthError`]: what the authentication flow and registry return;
//!   each variant maps to exactly one user-visible [`Status`]

use oauth_channel_storage::{BoxError, StorageError};
use thiserror::Error;

use crate::{algorithm::AlgorithmFamily, response::Status};

/// Classified token verification failure.
///
/// Exactly one variant is produced per failed verification; a verifier
/// never returns partial claims alongside an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The `exp` claim is in the past.
    #[error("token has expired")]
    TokenExpired,

    /// The signature does not match the header and claims.
    #[error("token has an invalid signature")]
    InvalidSignature,

    /// The token is not a decodable three-part JWS.
    #[error("token malformed")]
    TokenMalformed,

    /// The `iss` claim is not the service issuer.
    #[error("invalid token issuer")]
    InvalidIssuer,

    /// Any other parse or validation failure (algorithm mismatch, missing
    /// claims, wrong key id, ...).
    #[error("invalid access token")]
    InvalidAccessToken,
}

/// Errors raised while loading signing keys or signing claims.
///
/// Key and algorithm errors surface when the signer is constructed at
/// startup; [`SigningError::Signing`] is returned per issuance call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SigningError {
    /// Algorithm identifier is unknown or forbidden.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Key material could not be parsed for the configured family.
    #[error("Invalid {family} key: {message}")]
    InvalidKey {
        /// Family the key was loaded for.
        family: AlgorithmFamily,
        /// Parser message.
        message: String,
    },

    /// Asymmetric families need the public half to verify tokens.
    #[error("Missing verifying key for {0} algorithm")]
    MissingVerifyingKey(AlgorithmFamily),

    /// Encoding or signing the token failed.
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl SigningError {
    /// Creates an [`SigningError::InvalidKey`] error.
    #[must_use]
    pub fn invalid_key(family: AlgorithmFamily, message: impl Into<String>) -> Self {
        Self::InvalidKey { family, message: message.into() }
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required field is missing or blank.
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    /// The timezone is not a valid UTC offset.
    #[error("Invalid timezone offset: {0}")]
    InvalidTimezone(String),
}

/// Errors returned by the authentication flow and channel registry.
///
/// Each variant maps to a single [`Status`] via [`AuthError::status`].
/// Internal failures keep their full source chain for logging; only
/// [`AuthError::public_message`] should ever be shown to callers.
///
/// # Non-exhaustive
///
/// New variants may be added in minor releases. Downstream match expressions
/// must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// No channel is registered under the presented `client_id`.
    ///
    /// Reported as [`Status::Forbidden`] so that existence of a client id is
    /// not distinguishable from other rejected requests.
    #[error("Channel not found")]
    ChannelNotFound,

    /// The request lacks a required authenticated context (device id).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Credentials, grant type or token were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The presented token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The request body failed validation.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A required request parameter is missing.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Store, configuration or signing failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the failure, for logs only.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<BoxError>,
    },
}

impl AuthError {
    /// Creates an [`AuthError::Unauthorized`] error.
    #[must_use]
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(reason.into())
    }

    /// Creates an [`AuthError::Forbidden`] error.
    #[must_use]
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    /// Creates an [`AuthError::InvalidPayload`] error.
    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// Creates an [`AuthError::InvalidParameter`] error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Creates an [`AuthError::Internal`] error wrapping a source.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal { message: message.into(), source: Some(std::sync::Arc::new(source)) }
    }

    /// The user-visible status for this error.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::ChannelNotFound | Self::Forbidden(_) => Status::Forbidden,
            Self::Unauthorized(_) => Status::Unauthorized,
            Self::TokenExpired => Status::TokenExpired,
            Self::InvalidPayload(_) => Status::InvalidPayload,
            Self::InvalidParameter(_) => Status::InvalidParameter,
            Self::Internal { .. } => Status::UnexpectedError,
        }
    }

    /// Message safe to return to callers.
    ///
    /// Internal errors and channel lookups never reveal their detail.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::ChannelNotFound | Self::Forbidden(_) => "Forbidden request".to_owned(),
            Self::Internal { .. } => "Unexpected error".to_owned(),
            Self::Unauthorized(reason) => reason.clone(),
            Self::TokenExpired => TokenError::TokenExpired.to_string(),
            Self::InvalidPayload(message) | Self::InvalidParameter(message) => message.clone(),
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        if err.is_not_found() {
            AuthError::ChannelNotFound
        } else {
            AuthError::internal_with_source("channel store failure", err)
        }
    }
}

impl From<SigningError> for AuthError {
    fn from(err: SigningError) -> Self {
        AuthError::internal_with_source("token signing failure", err)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenExpired => AuthError::TokenExpired,
            other => AuthError::Unauthorized(other.to_string()),
        }
    }
}

/// Result type alias for flow and registry operations.
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::error::Error;

    use rstest::rstest;

    use super::*;

    #[test]
    fn test_token_error_display() {
        assert_eq!(TokenError::TokenExpired.to_string(), "token has expired");
        assert_eq!(TokenError::InvalidSignature.to_string(), "token has an invalid signature");
        assert_eq!(TokenError::TokenMalformed.to_string(), "token malformed");
        assert_eq!(TokenError::InvalidIssuer.to_string(), "invalid token issuer");
        assert_eq!(TokenError::InvalidAccessToken.to_string(), "invalid access token");
    }

    #[rstest]
    #[case(TokenError::InvalidSignature)]
    #[case(TokenError::TokenMalformed)]
    #[case(TokenError::InvalidIssuer)]
    #[case(TokenError::InvalidAccessToken)]
    fn test_token_errors_collapse_to_unauthorized(#[case] err: TokenError) {
        let auth: AuthError = err.into();
        assert_eq!(auth.status(), Status::Unauthorized);
    }

    #[test]
    fn test_expired_token_stays_distinct() {
        let auth: AuthError = TokenError::TokenExpired.into();
        assert!(matches!(auth, AuthError::TokenExpired));
        assert_eq!(auth.status(), Status::TokenExpired);
    }

    #[test]
    fn test_storage_not_found_maps_to_forbidden() {
        let auth: AuthError = StorageError::not_found("abc").into();
        assert!(matches!(auth, AuthError::ChannelNotFound));
        assert_eq!(auth.status(), Status::Forbidden);
        assert_eq!(auth.public_message(), "Forbidden request");
    }

    #[test]
    fn test_storage_failure_maps_to_internal_and_hides_detail() {
        let auth: AuthError = StorageError::connection("db-primary:27017 refused").into();
        assert_eq!(auth.status(), Status::UnexpectedError);
        assert!(!auth.public_message().contains("27017"));

        // The source chain is still available for logging.
        let source = auth.source().expect("source preserved");
        assert!(source.to_string().contains("27017"));
    }

    #[test]
    fn test_signing_error_maps_to_internal() {
        let jwt_err =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat);
        let auth: AuthError = SigningError::Signing(jwt_err).into();
        assert_eq!(auth.status(), Status::UnexpectedError);
    }

    #[test]
    fn test_signing_error_display() {
        let err = SigningError::invalid_key(AlgorithmFamily::Rsa, "bad pem");
        assert_eq!(err.to_string(), "Invalid RSA key: bad pem");

        let err = SigningError::MissingVerifyingKey(AlgorithmFamily::EdDsa);
        assert_eq!(err.to_string(), "Missing verifying key for EdDSA algorithm");
    }
}
