//! Service and signing configuration.
//!
//! Configuration is constructed once at startup, either through the
//! validating builders or by deserializing a config document, and is
//! read-only afterwards. Loading it from files or the environment is the
//! caller's concern.
//!
//! # Example
//!
//! ```
//! use oauth_channel_authn::config::{AuthConfig, SigningConfig};
//!
//! let signing = SigningConfig::builder()
//!     .algorithm("HS256")
//!     .key("a-long-random-hmac-secret".to_owned())
//!     .build()?;
//!
//! let config = AuthConfig::builder()
//!     .service_name("go-oauth")
//!     .timezone("+07:00")
//!     .signing(signing)
//!     .build()?;
//!
//! assert_eq!(config.issuer(), "https://oauth.github.com");
//! assert_eq!(config.timezone().local_minus_utc(), 7 * 3600);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::ConfigError;

/// Issuer written into every token and required on verification.
pub const DEFAULT_ISSUER: &str = "https://oauth.github.com";

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_owned()
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parses a UTC offset of the form `Z`, `UTC`, `+HH:MM`, `-HH:MM` or `+HHMM`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTimezone`] for anything else, including
/// offsets of a day or more.
pub fn parse_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidTimezone(value.to_owned());

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };

    let [h1, h2, m1, m2] = match *rest.as_bytes() {
        [h1, h2, b':', m1, m2] | [h1, h2, m1, m2] => [h1, h2, m1, m2],
        _ => return Err(invalid()),
    };
    if ![h1, h2, m1, m2].iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let two_digits = |hi: u8, lo: u8| i32::from(hi - b'0') * 10 + i32::from(lo - b'0');
    let hours = two_digits(h1, h2);
    let minutes = two_digits(m1, m2);
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

mod offset_serde {
    use chrono::FixedOffset;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(offset: &FixedOffset, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(offset)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FixedOffset, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_offset(&raw).map_err(serde::de::Error::custom)
    }
}

/// Signing key material and algorithm selection.
///
/// `key` is the HMAC secret for `HS*` algorithms and the PEM-encoded private
/// key for every other family. Asymmetric families also need the PEM public
/// key in `verifying_key` so that issued tokens can be verified.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningConfig {
    /// Algorithm identifier, e.g. `HS256` or `EdDSA`.
    pub(crate) algorithm: String,

    /// Signing secret or private key PEM.
    #[serde(skip_serializing)]
    pub(crate) key: Zeroizing<String>,

    /// Public key PEM for asymmetric families.
    #[serde(default)]
    pub(crate) verifying_key: Option<String>,

    /// Key id written to the `kid` header and required on verification.
    #[serde(default)]
    pub(crate) key_id: Option<String>,
}

#[bon::bon]
impl SigningConfig {
    /// Creates a signing configuration.
    ///
    /// The algorithm is only checked for presence here; it is resolved
    /// against the supported families when keys are loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the algorithm or key is blank.
    #[builder]
    pub fn new(
        #[builder(into)] algorithm: String,
        key: String,
        #[builder(into)] verifying_key: Option<String>,
        #[builder(into)] key_id: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self { algorithm, key: Zeroizing::new(key), verifying_key, key_id };
        config.validate()?;
        Ok(config)
    }

    /// Checks required fields. Deserialized configs should call this before use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.algorithm.trim().is_empty() {
            return Err(ConfigError::Missing("signing.algorithm"));
        }
        if self.key.trim().is_empty() {
            return Err(ConfigError::Missing("signing.key"));
        }
        if self.key_id.as_deref().is_some_and(|kid| kid.trim().is_empty()) {
            return Err(ConfigError::Missing("signing.key_id"));
        }
        Ok(())
    }

    /// Returns the algorithm identifier.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Returns the signing key material.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the verifying key PEM, if configured.
    #[must_use]
    pub fn verifying_key(&self) -> Option<&str> {
        self.verifying_key.as_deref()
    }

    /// Returns the key id, if configured.
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("algorithm", &self.algorithm)
            .field("key", &"[REDACTED]")
            .field("verifying_key", &self.verifying_key.as_ref().map(|_| "<pem>"))
            .field("key_id", &self.key_id)
            .finish()
    }
}

/// Configuration shared by the registry, issuer, verifier and flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Service name mixed into generated client ids.
    pub(crate) service_name: String,

    /// Token issuer (`iss`).
    #[serde(default = "default_issuer")]
    pub(crate) issuer: String,

    /// Offset used for channel timestamps and issuance times.
    #[serde(with = "offset_serde", default = "utc")]
    pub(crate) timezone: FixedOffset,

    /// Signing configuration.
    pub(crate) signing: SigningConfig,
}

#[bon::bon]
impl AuthConfig {
    /// Creates a service configuration.
    ///
    /// # Optional Fields
    ///
    /// * `issuer` - Token issuer (default: [`DEFAULT_ISSUER`]).
    /// * `timezone` - UTC offset such as `"+07:00"` (default: UTC).
    ///
    /// # Errors
    ///
    /// Returns an error if the service name or issuer is blank, the timezone
    /// cannot be parsed, or the signing configuration is invalid.
    #[builder]
    pub fn new(
        #[builder(into)] service_name: String,
        #[builder(into, default = default_issuer())] issuer: String,
        #[builder(into)] timezone: Option<String>,
        signing: SigningConfig,
    ) -> Result<Self, ConfigError> {
        let timezone = match timezone {
            Some(raw) => parse_offset(&raw)?,
            None => utc(),
        };
        let config = Self { service_name, issuer, timezone, signing };
        config.validate()?;
        Ok(config)
    }

    /// Checks required fields, including the nested signing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Missing("service_name"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Missing("issuer"));
        }
        self.signing.validate()
    }

    /// Returns the service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the token issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the configured UTC offset.
    #[must_use]
    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Returns the signing configuration.
    #[must_use]
    pub fn signing(&self) -> &SigningConfig {
        &self.signing
    }
}
