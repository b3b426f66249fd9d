//! Key loading per algorithm family.
//!
//! Each [`AlgorithmFamily`] has exactly one [`KeyLoader`]. The loader is
//! picked once when [`SigningKeys::load`] runs at startup, and the parsed
//! keys are shared behind [`Arc`] by the issuer and verifier for the rest of
//! the process lifetime.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};

use crate::{
    algorithm::{AlgorithmFamily, resolve_algorithm},
    config::SigningConfig,
    error::SigningError,
};

/// Parses key material for one algorithm family.
pub trait KeyLoader: Send + Sync {
    /// Family this loader handles.
    fn family(&self) -> AlgorithmFamily;

    /// Parses the signing key.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidKey`] if the material cannot be parsed.
    fn encoding_key(&self, key: &str) -> Result<EncodingKey, SigningError>;

    /// Parses the verifying key.
    ///
    /// `signing_key` is the configured signing material and `verifying_key`
    /// the optional public half.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::MissingVerifyingKey`] if the family needs a
    /// public key and none was configured, or [`SigningError::InvalidKey`]
    /// if it cannot be parsed.
    fn decoding_key(
        &self,
        signing_key: &str,
        verifying_key: Option<&str>,
    ) -> Result<DecodingKey, SigningError>;
}

/// Shared-secret keys for `HS*`.
#[derive(Debug, Clone, Copy)]
pub struct HmacKeyLoader;

/// PEM keys for `RS*` and `PS*`.
#[derive(Debug, Clone, Copy)]
pub struct RsaKeyLoader;

/// PEM keys for `ES256` and `ES384`.
#[derive(Debug, Clone, Copy)]
pub struct EcKeyLoader;

/// PEM keys for `EdDSA`.
#[derive(Debug, Clone, Copy)]
pub struct EdDsaKeyLoader;

impl KeyLoader for HmacKeyLoader {
    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::Hmac
    }

    fn encoding_key(&self, key: &str) -> Result<EncodingKey, SigningError> {
        Ok(EncodingKey::from_secret(key.as_bytes()))
    }

    fn decoding_key(
        &self,
        signing_key: &str,
        _verifying_key: Option<&str>,
    ) -> Result<DecodingKey, SigningError> {
        Ok(DecodingKey::from_secret(signing_key.as_bytes()))
    }
}

fn require_public(family: AlgorithmFamily, key: Option<&str>) -> Result<&[u8], SigningError> {
    key.filter(|pem| !pem.trim().is_empty())
        .map(str::as_bytes)
        .ok_or(SigningError::MissingVerifyingKey(family))
}

impl KeyLoader for RsaKeyLoader {
    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::Rsa
    }

    fn encoding_key(&self, key: &str) -> Result<EncodingKey, SigningError> {
        EncodingKey::from_rsa_pem(key.as_bytes())
            .map_err(|e| SigningError::invalid_key(self.family(), e.to_string()))
    }

    fn decoding_key(
        &self,
        _signing_key: &str,
        verifying_key: Option<&str>,
    ) -> Result<DecodingKey, SigningError> {
        DecodingKey::from_rsa_pem(require_public(self.family(), verifying_key)?)
            .map_err(|e| SigningError::invalid_key(self.family(), e.to_string()))
    }
}

impl KeyLoader for EcKeyLoader {
    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::Ec
    }

    fn encoding_key(&self, key: &str) -> Result<EncodingKey, SigningError> {
        EncodingKey::from_ec_pem(key.as_bytes())
            .map_err(|e| SigningError::invalid_key(self.family(), e.to_string()))
    }

    fn decoding_key(
        &self,
        _signing_key: &str,
        verifying_key: Option<&str>,
    ) -> Result<DecodingKey, SigningError> {
        DecodingKey::from_ec_pem(require_public(self.family(), verifying_key)?)
            .map_err(|e| SigningError::invalid_key(self.family(), e.to_string()))
    }
}

impl KeyLoader for EdDsaKeyLoader {
    fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::EdDsa
    }

    fn encoding_key(&self, key: &str) -> Result<EncodingKey, SigningError> {
        EncodingKey::from_ed_pem(key.as_bytes())
            .map_err(|e| SigningError::invalid_key(self.family(), e.to_string()))
    }

    fn decoding_key(
        &self,
        _signing_key: &str,
        verifying_key: Option<&str>,
    ) -> Result<DecodingKey, SigningError> {
        DecodingKey::from_ed_pem(require_public(self.family(), verifying_key)?)
            .map_err(|e| SigningError::invalid_key(self.family(), e.to_string()))
    }
}

impl AlgorithmFamily {
    /// Returns the key loader for this family.
    #[must_use]
    pub fn loader(&self) -> &'static dyn KeyLoader {
        match self {
            Self::Hmac => &HmacKeyLoader,
            Self::Rsa => &RsaKeyLoader,
            Self::Ec => &EcKeyLoader,
            Self::EdDsa => &EdDsaKeyLoader,
        }
    }
}

/// Parsed signing and verifying keys for the configured algorithm.
///
/// Cheap to clone; the key material is shared.
#[derive(Clone)]
pub struct SigningKeys {
    algorithm: Algorithm,
    family: AlgorithmFamily,
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    key_id: Option<String>,
}

impl SigningKeys {
    /// Resolves the algorithm and parses both keys.
    ///
    /// # Errors
    ///
    /// Returns a [`SigningError`] if the algorithm is unsupported or either
    /// key cannot be loaded. These errors are startup-fatal.
    pub fn load(config: &SigningConfig) -> Result<Self, SigningError> {
        let (algorithm, family) = resolve_algorithm(config.algorithm())?;
        let loader = family.loader();

        let encoding = loader.encoding_key(config.key())?;
        let decoding = loader.decoding_key(config.key(), config.verifying_key())?;

        tracing::debug!(
            algorithm = ?algorithm,
            family = %family,
            key_id = config.key_id().unwrap_or(""),
            "Signing keys loaded"
        );

        Ok(Self {
            algorithm,
            family,
            encoding: Arc::new(encoding),
            decoding: Arc::new(decoding),
            key_id: config.key_id().map(str::to_owned),
        })
    }

    /// Returns the configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the algorithm family.
    #[must_use]
    pub fn family(&self) -> AlgorithmFamily {
        self.family
    }

    /// Returns the configured key id.
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    /// JWS header for newly issued tokens.
    #[must_use]
    pub fn header(&self) -> Header {
        let mut header = Header::new(self.algorithm);
        header.kid = self.key_id.clone();
        header
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("algorithm", &self.algorithm)
            .field("family", &self.family)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}
