//! Access token claims.
//!
//! Claims are built per issuance call from an authenticated channel and the
//! issuance instant, signed immediately, and never stored.
//!
//! ```json
//! {
//!   "sub": "<channel id>",
//!   "aud": "<redirect uri>",
//!   "iss": "https://oauth.github.com",
//!   "iat": 1700000000,
//!   "exp": 1700000300,
//!   "clientId": "5e1f0c9b2a3d4e5f",
//!   "scopes": ["read"],
//!   "isPublic": false,
//!   "isActive": true,
//!   "deviceId": "device-123"
//! }
//! ```

use chrono::{DateTime, TimeDelta, TimeZone};
use oauth_channel_storage::Channel;
use serde::{Deserialize, Serialize};

/// Lifetime of an access token, in seconds.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 300;

/// Lifetime of an access token.
pub const ACCESS_TOKEN_TTL: TimeDelta = TimeDelta::seconds(ACCESS_TOKEN_TTL_SECS);

/// Claims carried by an access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the channel id.
    pub sub: String,
    /// Audience: the channel's redirect URI.
    pub aud: String,
    /// Issuer.
    pub iss: String,
    /// Issued at (seconds since epoch).
    pub iat: u64,
    /// Expiration time (seconds since epoch).
    pub exp: u64,
    /// Public client identifier.
    #[serde(rename = "clientId")]
    pub client_id: String,
    /// Scopes granted to the channel.
    pub scopes: Vec<String>,
    /// Whether the channel is a public client.
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    /// Whether the channel was active at issuance.
    #[serde(rename = "isActive")]
    pub is_active: bool,
    /// Device the token was requested from.
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

impl TokenClaims {
    /// Builds claims for `channel` issued at `issued_at`.
    ///
    /// `exp` is always `iat + ACCESS_TOKEN_TTL_SECS`.
    #[must_use]
    pub fn for_channel<Tz: TimeZone>(
        channel: &Channel,
        device_id: &str,
        issuer: &str,
        issued_at: &DateTime<Tz>,
    ) -> Self {
        let iat = epoch_seconds(issued_at);
        Self {
            sub: channel.id.to_string(),
            aud: channel.redirect_uri.clone(),
            iss: issuer.to_owned(),
            iat,
            exp: iat.saturating_add(ACCESS_TOKEN_TTL_SECS.unsigned_abs()),
            client_id: channel.client_id.clone(),
            scopes: channel.scopes.clone(),
            is_public: channel.is_public(),
            is_active: channel.is_active,
            device_id: device_id.to_owned(),
        }
    }
}

fn epoch_seconds<Tz: TimeZone>(instant: &DateTime<Tz>) -> u64 {
    u64::try_from(instant.timestamp()).unwrap_or(0)
}
