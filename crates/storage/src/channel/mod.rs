//! Channel records and their storage.
//!
//! A channel is an OAuth client registration: its public `client_id`, the
//! shared secret, and the grant types and scopes it may use. Records are
//! stored once at registration and looked up by `client_id` on every token
//! request.
//!
//! # Storage Layout
//!
//! Document-store backends keep one document per channel in the
//! [`CHANNEL_COLLECTION`] collection with a unique index on `client_id`.

mod record;
mod store;

pub use record::Channel;
pub use store::{CHANNEL_COLLECTION, ChannelStore, MemoryChannelStore};
