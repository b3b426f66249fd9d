//! Channel record type.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::types::{ChannelId, ClientType, GrantType};

/// A registered OAuth client ("channel").
///
/// Records are written once at registration and never mutated afterwards,
/// so concurrent token requests can read them without coordination.
///
/// # Secret Handling
///
/// `secret_key` is wrapped in [`Zeroizing`] and redacted from the [`Debug`]
/// output. It is serialized because it is part of the stored record; callers
/// outside of registration never receive a `Channel` value.
///
/// # Example
///
/// ```
/// use oauth_channel_storage::{Channel, ClientType, GrantType};
///
/// let channel = Channel::builder()
///     .name("mobile-app")
///     .client_id("3f2a9c4e1b7d8a60")
///     .client_type(ClientType::Confidential)
///     .secret_key("NJLTMJAYYMQTMJG0NS00ZQ".to_owned())
///     .grant_types(vec![GrantType::ClientCredentials])
///     .scopes(vec!["read".to_owned()])
///     .redirect_uri("https://app.example.com")
///     .build();
///
/// assert!(channel.is_active);
/// assert!(!format!("{channel:?}").contains("NJLTMJAYYMQTMJG0NS00ZQ"));
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize, bon::Builder)]
pub struct Channel {
    /// Opaque identifier, used as the token subject.
    #[builder(default = ChannelId::generate())]
    pub id: ChannelId,

    /// Display name supplied at registration.
    #[builder(into)]
    pub name: String,

    /// Public client identifier. Unique across the store.
    #[builder(into)]
    pub client_id: String,

    /// Whether the client can keep its secret confidential.
    pub client_type: ClientType,

    /// Shared secret presented by the client on token requests.
    #[builder(into)]
    pub secret_key: Zeroizing<String>,

    /// Permitted grant types. The first entry is the primary grant type.
    #[builder(default)]
    pub grant_types: Vec<GrantType>,

    /// Scopes granted to the channel and copied into every token.
    #[builder(default)]
    pub scopes: Vec<String>,

    /// Redirect URI; doubles as the token audience.
    #[builder(into)]
    pub redirect_uri: String,

    /// Eligibility flag, copied into token claims.
    #[builder(default = true)]
    pub is_active: bool,

    /// Registration time in the service timezone.
    #[builder(default = Utc::now().fixed_offset())]
    pub created_at: DateTime<FixedOffset>,

    /// Last modification time; equal to `created_at` for immutable records.
    #[builder(default = Utc::now().fixed_offset())]
    pub updated_at: DateTime<FixedOffset>,
}

impl Channel {
    /// Returns the primary (first) grant type, if any.
    #[must_use]
    pub fn primary_grant_type(&self) -> Option<GrantType> {
        self.grant_types.first().copied()
    }

    /// Returns `true` if the channel is a public client.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.client_type.is_public()
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("client_id", &self.client_id)
            .field("client_type", &self.client_type)
            .field("secret_key", &"<redacted>")
            .field("grant_types", &self.grant_types)
            .field("scopes", &self.scopes)
            .field("redirect_uri", &self.redirect_uri)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn minimal() -> Channel {
        Channel::builder()
            .name("svc")
            .client_id("0011223344556677")
            .client_type(ClientType::Public)
            .secret_key("SECRET".to_owned())
            .redirect_uri("https://svc.example.com")
            .build()
    }

    #[test]
    fn test_builder_defaults() {
        let channel = minimal();
        assert!(channel.is_active);
        assert!(channel.grant_types.is_empty());
        assert!(channel.scopes.is_empty());
        assert!(channel.primary_grant_type().is_none());
        assert!(channel.is_public());
    }

    #[test]
    fn test_primary_grant_type_is_first_entry() {
        let channel = Channel::builder()
            .name("svc")
            .client_id("0011223344556677")
            .client_type(ClientType::Confidential)
            .secret_key("SECRET".to_owned())
            .grant_types(vec![GrantType::AuthorizationCode, GrantType::ClientCredentials])
            .redirect_uri("https://svc.example.com")
            .build();

        assert_eq!(channel.primary_grant_type(), Some(GrantType::AuthorizationCode));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", minimal());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("SECRET"));
    }

    #[test]
    fn test_serde_roundtrip_keeps_secret() {
        let channel = minimal();
        let json = serde_json::to_string(&channel).unwrap();
        let decoded: Channel = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, channel);
        assert_eq!(decoded.secret_key.as_str(), "SECRET");
    }
}
