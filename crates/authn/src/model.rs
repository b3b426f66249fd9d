//! Request and response payloads.
//!
//! The transport layer decodes requests into these types and serializes the
//! responses back; field names are camelCase on the wire.

use chrono::{DateTime, FixedOffset};
use oauth_channel_storage::{ClientType, GrantType};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::AuthError;

/// Header carrying the caller's device identifier.
pub const DEVICE_ID_HEADER: &str = "X-DEVICE-ID";

/// Token type reported for every issued access token.
pub const BEARER: &str = "Bearer";

fn invalid_field(field: &str, value: &str) -> AuthError {
    AuthError::invalid_payload(format!("invalid '{field}' with value '{value}'"))
}

/// Channel registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChannelRequest {
    /// Display name.
    #[builder(into)]
    pub name: String,
    /// Public or confidential client.
    pub client_type: ClientType,
    /// Permitted grant types; the first is the primary one.
    pub grant_types: Vec<GrantType>,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Redirect URI, used as the token audience.
    #[builder(into)]
    pub redirect_uri: String,
}

impl RegisterChannelRequest {
    /// Validates required fields.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPayload`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.name.trim().is_empty() {
            return Err(invalid_field("name", &self.name));
        }
        if self.grant_types.is_empty() {
            return Err(invalid_field("grantTypes", "[]"));
        }
        if self.scopes.is_empty() {
            return Err(invalid_field("scopes", "[]"));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(invalid_field("redirectUri", &self.redirect_uri));
        }
        Ok(())
    }
}

/// Client-credentials token request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Public client identifier.
    pub client_id: String,
    /// Shared secret.
    pub client_secret: Zeroizing<String>,
    /// Requested grant type, as sent by the client.
    pub grant_type: String,
}

impl TokenRequest {
    /// Creates a token request.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        grant_type: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Zeroizing::new(client_secret.into()),
            grant_type: grant_type.into(),
        }
    }

    /// Validates that every field is present.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidPayload`] naming the first blank field.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.client_id.trim().is_empty() {
            return Err(invalid_field("clientId", &self.client_id));
        }
        if self.client_secret.is_empty() {
            return Err(invalid_field("clientSecret", ""));
        }
        if self.grant_type.trim().is_empty() {
            return Err(invalid_field("grantType", &self.grant_type));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("grant_type", &self.grant_type)
            .finish()
    }
}

/// Token verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVerifyRequest {
    /// Client the token is expected to belong to.
    pub client_id: String,
    /// Presented access token.
    pub token: String,
}

impl TokenVerifyRequest {
    /// Creates a verification request.
    #[must_use]
    pub fn new(client_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), token: token.into() }
    }
}

/// Successful token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Always [`BEARER`].
    pub token_type: String,
    /// Expiry in the service timezone.
    pub expired_at: DateTime<FixedOffset>,
    /// Signed access token.
    pub token: String,
    /// Opaque refresh token, when one was issued.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVerification {
    /// Client the token was issued to.
    pub client_id: String,
    /// Scopes carried by the token.
    pub scopes: Vec<String>,
}

/// Authenticated device identifier taken from [`DEVICE_ID_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Validates the raw header value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Forbidden`] if the header is missing or blank.
    pub fn from_header(value: Option<&str>) -> Result<Self, AuthError> {
        match value.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_owned())),
            _ => Err(AuthError::forbidden(format!("missing {DEVICE_ID_HEADER} header"))),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
