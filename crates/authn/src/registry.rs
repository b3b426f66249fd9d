//! Channel registration.
//!
//! Registration validates the request, derives credentials, stamps the
//! record in the service timezone and performs a single `insert_one`.
//! Uniqueness of `client_id` is left to the store.

use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use oauth_channel_storage::{Channel, ChannelId, ChannelStore};

use crate::{
    config::AuthConfig,
    credentials::CredentialGenerator,
    error::{AuthError, Result},
    model::RegisterChannelRequest,
};

/// Message returned with a successful registration.
pub const CREATE_CHANNEL_SUCCESS: &str = "Create Channel Successfully";

/// Message returned with a successful update.
pub const UPDATE_CHANNEL_SUCCESS: &str = "Update Channel Successfully";

/// Creates channels.
#[derive(Clone)]
pub struct ChannelRegistry {
    store: Arc<dyn ChannelStore>,
    generator: CredentialGenerator,
    timezone: FixedOffset,
}

impl ChannelRegistry {
    /// Creates a registry writing to `store`.
    #[must_use]
    pub fn new(config: &AuthConfig, store: Arc<dyn ChannelStore>) -> Self {
        Self {
            store,
            generator: CredentialGenerator::new(config.service_name()),
            timezone: config.timezone(),
        }
    }

    /// Registers a new channel and returns the stored record.
    ///
    /// The returned record is the only place the generated secret is ever
    /// handed out.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidPayload`] if the request fails validation
    /// - [`AuthError::Internal`] if the store rejects the write; the store error is logged and kept
    ///   as the source but never shown to callers
    #[tracing::instrument(skip_all, fields(name = %request.name))]
    pub async fn register(&self, request: &RegisterChannelRequest) -> Result<Channel> {
        request.validate()?;

        let now = Utc::now().with_timezone(&self.timezone);
        let id = ChannelId::generate();

        let channel = Channel::builder()
            .id(id)
            .name(request.name.clone())
            .client_id(self.generator.client_id(&request.name))
            .client_type(request.client_type)
            .secret_key(self.generator.secret_key(&id.to_string()))
            .grant_types(request.grant_types.clone())
            .scopes(request.scopes.clone())
            .redirect_uri(request.redirect_uri.clone())
            .is_active(true)
            .created_at(now)
            .updated_at(now)
            .build();

        if let Err(e) = self.store.insert_one(&channel).await {
            tracing::error!(
                client_id = %channel.client_id,
                error = %e,
                "Failed to store new channel"
            );
            return Err(AuthError::internal_with_source("channel insert failed", e));
        }

        tracing::info!(
            channel_id = %channel.id,
            client_id = %channel.client_id,
            client_type = %channel.client_type,
            "Channel registered"
        );

        Ok(channel)
    }

    /// Accepts an update for `channel_id`.
    ///
    /// Channels are immutable; nothing is validated or written and the call
    /// always succeeds.
    ///
    /// # Errors
    ///
    /// Never returns an error.
    #[tracing::instrument(skip_all, fields(channel_id = %channel_id))]
    pub async fn update_channel(
        &self,
        channel_id: &str,
        _request: &RegisterChannelRequest,
    ) -> Result<()> {
        tracing::debug!("Channel update accepted without changes");
        Ok(())
    }
}

impl std::fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelRegistry")
            .field("generator", &self.generator)
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use oauth_channel_storage::{ClientType, GrantType, MemoryChannelStore};

    use super::*;
    use crate::{response::Status, testutil::test_config};

    fn mobile_app_request() -> RegisterChannelRequest {
        RegisterChannelRequest::builder()
            .name("mobile-app")
            .client_type(ClientType::Confidential)
            .grant_types(vec![GrantType::ClientCredentials])
            .scopes(vec!["read".to_owned()])
            .redirect_uri("https://app.example.com")
            .build()
    }

    #[tokio::test]
    async fn test_register_persists_active_channel() {
        let store = MemoryChannelStore::new();
        let registry = ChannelRegistry::new(&test_config(), Arc::new(store.clone()));

        let channel = registry.register(&mobile_app_request()).await.unwrap();

        assert!(channel.is_active);
        assert_eq!(channel.client_id.len(), 16);
        assert_eq!(channel.secret_key.len(), 22);
        assert_eq!(channel.created_at, channel.updated_at);

        let stored = store.find_one(&channel.client_id).await.unwrap();
        assert_eq!(stored, channel);
        assert_eq!(stored.redirect_uri, "https://app.example.com");
        assert_eq!(stored.grant_types, vec![GrantType::ClientCredentials]);
    }

    #[tokio::test]
    async fn test_register_uses_configured_timezone() {
        let base = test_config();
        let config = AuthConfig::builder()
            .service_name(base.service_name())
            .timezone("+07:00")
            .signing(base.signing().clone())
            .build()
            .unwrap();
        let registry = ChannelRegistry::new(&config, Arc::new(MemoryChannelStore::new()));

        let channel = registry.register(&mobile_app_request()).await.unwrap();
        assert_eq!(channel.created_at.offset().local_minus_utc(), 7 * 3600);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_payload_without_writing() {
        let store = MemoryChannelStore::new();
        let registry = ChannelRegistry::new(&test_config(), Arc::new(store.clone()));

        let request = RegisterChannelRequest { scopes: vec![], ..mobile_app_request() };
        let err = registry.register(&request).await.unwrap_err();

        assert_eq!(err.status(), Status::InvalidPayload);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_two_registrations_get_distinct_credentials() {
        let store = MemoryChannelStore::new();
        let registry = ChannelRegistry::new(&test_config(), Arc::new(store.clone()));

        let a = registry.register(&mobile_app_request()).await.unwrap();
        let b = registry.register(&mobile_app_request()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(*a.secret_key, *b.secret_key);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_update_channel_is_noop() {
        let store = MemoryChannelStore::new();
        let registry = ChannelRegistry::new(&test_config(), Arc::new(store.clone()));

        registry.update_channel("does-not-exist", &mobile_app_request()).await.unwrap();
        assert!(store.is_empty());
    }
}
