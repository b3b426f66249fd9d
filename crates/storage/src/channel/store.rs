//! Storage trait for channel records.
//!
//! This module provides the [`ChannelStore`] trait that abstracts
//! persistence of registered channels. Production deployments back it with
//! a document store collection keyed by `client_id`; tests and local
//! development use [`MemoryChannelStore`].
//!
//! # Usage
//!
//! ```no_run
//! // Demonstrates the trait interface; requires a concrete store implementation.
//! use oauth_channel_storage::{Channel, ChannelStore, StorageError};
//!
//! async fn lookup<S: ChannelStore>(store: &S, client_id: &str) -> Result<Channel, StorageError> {
//!     store.find_one(client_id).await
//! }
//! ```

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use async_trait::async_trait;
use fail::fail_point;
use parking_lot::RwLock;

use crate::{
    channel::Channel,
    error::{StorageError, StorageResult},
};

/// Collection name used by document-store backends.
pub const CHANNEL_COLLECTION: &str = "oauth_channel";

/// Persistence layer for channel records.
///
/// Both operations are single point reads or writes keyed by `client_id`.
/// Implementations must not retry internally; the authentication layer
/// surfaces every failure immediately.
///
/// # Error Handling
///
/// - [`find_one`](Self::find_one) returns [`StorageError::NotFound`] when no
///   channel matches. Any other variant is treated as a store failure.
/// - [`insert_one`](Self::insert_one) returns [`StorageError::Duplicate`]
///   when the backend enforces `client_id` uniqueness and the key exists.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Stores a newly registered channel.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A channel with the same `client_id` already exists
    /// - The storage backend is unavailable
    /// - Serialization fails
    async fn insert_one(&self, channel: &Channel) -> StorageResult<()>;

    /// Retrieves a channel by its public client identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no channel has this `client_id`,
    /// or another [`StorageError`] if the backend fails.
    async fn find_one(&self, client_id: &str) -> StorageResult<Channel>;
}

/// In-memory implementation of [`ChannelStore`] for testing.
///
/// Channels are kept in a hash map keyed by `client_id`, guarded by a
/// [`parking_lot::RwLock`]. Cloning the store shares the underlying map.
///
/// # Fail Points
///
/// With the `failpoints` feature enabled, `channel-store-insert` and
/// `channel-store-find` can be configured to return an injected
/// [`StorageError::Internal`].
///
/// # Examples
///
/// ```
/// use oauth_channel_storage::{Channel, ChannelStore, ClientType, MemoryChannelStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryChannelStore::new();
///
///     let channel = Channel::builder()
///         .name("billing")
///         .client_id("9c1d2e3f4a5b6c7d")
///         .client_type(ClientType::Confidential)
///         .secret_key("S3CRET".to_owned())
///         .redirect_uri("https://billing.example.com")
///         .build();
///
///     store.insert_one(&channel).await?;
///
///     let found = store.find_one("9c1d2e3f4a5b6c7d").await?;
///     assert_eq!(found.name, "billing");
///     Ok(())
/// }
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryChannelStore {
    /// Channels indexed by `client_id`.
    channels: Arc<RwLock<HashMap<String, Channel>>>,
}

impl MemoryChannelStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    /// Returns `true` if no channel has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }
}

#[async_trait]
impl ChannelStore for MemoryChannelStore {
    #[tracing::instrument(skip(self, channel), fields(client_id = %channel.client_id))]
    async fn insert_one(&self, channel: &Channel) -> StorageResult<()> {
        fail_point!("channel-store-insert", |_| {
            Err(StorageError::internal("injected failure at channel-store-insert"))
        });

        let mut channels = self.channels.write();
        match channels.entry(channel.client_id.clone()) {
            Entry::Occupied(_) => Err(StorageError::duplicate(&channel.client_id)),
            Entry::Vacant(entry) => {
                entry.insert(channel.clone());
                tracing::debug!(channel_id = %channel.id, "Channel inserted");
                Ok(())
            },
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_one(&self, client_id: &str) -> StorageResult<Channel> {
        fail_point!("channel-store-find", |_| {
            Err(StorageError::internal("injected failure at channel-store-find"))
        });

        self.channels
            .read()
            .get(client_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(client_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::testutil::sample_channel;

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryChannelStore::new();
        let channel = sample_channel("orders", "aaaaaaaaaaaaaaaa");

        store.insert_one(&channel).await.unwrap();

        let found = store.find_one("aaaaaaaaaaaaaaaa").await.unwrap();
        assert_eq!(found, channel);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let store = MemoryChannelStore::new();
        let err = store.find_one("missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(matches!(err, StorageError::NotFound { ref key } if key == "missing"));
    }

    #[tokio::test]
    async fn test_duplicate_client_id_rejected() {
        let store = MemoryChannelStore::new();
        store.insert_one(&sample_channel("first", "bbbbbbbbbbbbbbbb")).await.unwrap();

        let err = store.insert_one(&sample_channel("second", "bbbbbbbbbbbbbbbb")).await.unwrap_err();
        assert!(matches!(err, StorageError::Duplicate { .. }));

        // The original record is untouched.
        let found = store.find_one("bbbbbbbbbbbbbbbb").await.unwrap();
        assert_eq!(found.name, "first");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryChannelStore::new();
        let clone = store.clone();
        store.insert_one(&sample_channel("shared", "cccccccccccccccc")).await.unwrap();

        assert!(clone.find_one("cccccccccccccccc").await.is_ok());
        assert!(!clone.is_empty());
    }
}
