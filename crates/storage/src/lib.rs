//! Channel record types and storage for the channel OAuth service.
//!
//! This crate provides the [`Channel`] record, the [`ChannelStore`] trait the
//! authentication layer reads and writes through, and an in-memory
//! implementation for tests and local development.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               oauth-channel-authn                           │
//! │   ChannelRegistry (insert)  │  AuthenticationFlow (find)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │               oauth-channel-storage                         │
//! │              ChannelStore trait                             │
//! │          (insert_one, find_one by client_id)                │
//! ├──────────────────────┬──────────────────────────────────────┤
//! │ MemoryChannelStore   │   document-store adapter             │
//! │   (testing)          │   (deployment, out of tree)          │
//! └──────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use oauth_channel_storage::{Channel, ChannelStore, ClientType, GrantType, MemoryChannelStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryChannelStore::new();
//!
//!     let channel = Channel::builder()
//!         .name("mobile-app")
//!         .client_id("5e1f0c9b2a3d4e5f")
//!         .client_type(ClientType::Confidential)
//!         .secret_key("QZK1NJYWMDETNDC4ZC00MG".to_owned())
//!         .grant_types(vec![GrantType::ClientCredentials])
//!         .scopes(vec!["read".to_owned()])
//!         .redirect_uri("https://app.example.com")
//!         .build();
//!     store.insert_one(&channel).await?;
//!
//!     let found = store.find_one("5e1f0c9b2a3d4e5f").await?;
//!     assert_eq!(found.id, channel.id);
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a Backend
//!
//! 1. Implement [`ChannelStore`]
//! 2. Enforce uniqueness of `client_id` and map collisions to [`StorageError::Duplicate`]
//! 3. Map "no document" to [`StorageError::NotFound`] and everything else to the remaining
//!    [`StorageError`] variants
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module with sample channels and populated stores.
//! - **`failpoints`**: Enables `fail_point!` injection in [`MemoryChannelStore`].

#![deny(unsafe_code)]

pub mod channel;
pub mod error;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod types;

pub use channel::{CHANNEL_COLLECTION, Channel, ChannelStore, MemoryChannelStore};
pub use error::{BoxError, StorageError, StorageResult};
pub use types::{ChannelId, ClientType, GrantType, UnknownVariant};
pub use zeroize::Zeroizing;
