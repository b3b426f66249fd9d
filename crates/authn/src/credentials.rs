//! Client credential generation.
//!
//! A new channel gets two values:
//!
//! - a public `client_id`: the first 8 bytes of `SHA-256("{name}:{service}:{nanos}")` as 16
//!   lowercase hex characters
//! - a `secret_key`: 22 characters over `[A-Z0-9_-]`, derived from a name-based UUID in a fresh
//!   random namespace, so two calls for the same channel id never agree

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Length of a generated `client_id`.
pub const CLIENT_ID_LEN: usize = 16;

/// Length of a generated `secret_key`.
pub const SECRET_KEY_LEN: usize = 22;

/// Derives client ids and secrets for new channels.
#[derive(Debug, Clone)]
pub struct CredentialGenerator {
    service_name: String,
}

impl CredentialGenerator {
    /// Creates a generator that mixes `service_name` into client ids.
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    /// Derives a client id for `name` from the current time.
    #[must_use]
    pub fn client_id(&self, name: &str) -> String {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        self.client_id_at(name, nanos)
    }

    /// Derives a client id for `name` at a given Unix time in nanoseconds.
    #[must_use]
    pub fn client_id_at(&self, name: &str, unix_nanos: i64) -> String {
        let digest = Sha256::digest(format!("{name}:{}:{unix_nanos}", self.service_name));
        hex::encode(&digest[..CLIENT_ID_LEN / 2])
    }

    /// Derives a secret for the channel with id `channel_id`.
    ///
    /// The UUID v3 of `channel_id ‖ channel_id` is computed in a random v4
    /// namespace; the first 16 bytes of its canonical string form are
    /// base64url-encoded without padding and upper-cased.
    #[must_use]
    pub fn secret_key(&self, channel_id: &str) -> Zeroizing<String> {
        let mut name = Vec::with_capacity(channel_id.len() * 2);
        name.extend_from_slice(channel_id.as_bytes());
        name.extend_from_slice(channel_id.as_bytes());

        let derived = Uuid::new_v3(&Uuid::new_v4(), &name).to_string();
        let encoded = URL_SAFE_NO_PAD.encode(&derived.as_bytes()[..16]);
        Zeroizing::new(encoded.to_ascii_uppercase())
    }
}
