//! Shared test utilities for channel storage.
//!
//! Feature-gated behind `testutil` to keep them out of production builds.
//!
//! ```toml
//! [dev-dependencies]
//! oauth-channel-storage = { path = "../storage", features = ["testutil"] }
//! ```

use crate::{
    channel::{Channel, ChannelStore, MemoryChannelStore},
    types::{ClientType, GrantType},
};

/// Secret assigned to every channel created by [`sample_channel`].
pub const SAMPLE_SECRET: &str = "MZJHYTCXNGQTMWE2NS00NW";

/// Builds a confidential `client_credentials` channel with scope `read`.
#[must_use]
pub fn sample_channel(name: &str, client_id: &str) -> Channel {
    Channel::builder()
        .name(name)
        .client_id(client_id)
        .client_type(ClientType::Confidential)
        .secret_key(SAMPLE_SECRET.to_owned())
        .grant_types(vec![GrantType::ClientCredentials])
        .scopes(vec!["read".to_owned()])
        .redirect_uri(format!("https://{name}.example.com"))
        .build()
}

/// Creates a [`MemoryChannelStore`] holding the given channels.
///
/// # Panics
///
/// Panics if two channels share a `client_id`.
pub async fn populated_store(channels: &[Channel]) -> MemoryChannelStore {
    let store = MemoryChannelStore::new();
    for channel in channels {
        store.insert_one(channel).await.expect("insert test channel");
    }
    store
}
