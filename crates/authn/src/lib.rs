//! # Channel OAuth Authentication
//!
//! Client-credentials authentication for registered channels.
//!
//! This crate provides:
//! - **Channel registration**: credential generation and a single store write
//! - **Token issuance**: signed 300-second access tokens with HMAC, RSA, EC or EdDSA keys
//! - **Token verification**: a closed set of [`TokenError`] classifications
//! - **Authentication flow**: lookup, constant-time secret check, grant gating, issuance
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use oauth_channel_authn::{
//!     AuthenticationFlow, ChannelRegistry,
//!     config::{AuthConfig, SigningConfig},
//!     model::{DeviceId, RegisterChannelRequest, TokenRequest, TokenVerifyRequest},
//! };
//! use oauth_channel_storage::{ClientType, GrantType, MemoryChannelStore};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let signing = SigningConfig::builder().algorithm("HS256").key("hmac-secret".to_owned()).build()?;
//!     let config = AuthConfig::builder().service_name("go-oauth").signing(signing).build()?;
//!     let store = Arc::new(MemoryChannelStore::new());
//!
//!     let registry = ChannelRegistry::new(&config, store.clone());
//!     let channel = registry
//!         .register(
//!             &RegisterChannelRequest::builder()
//!                 .name("mobile-app")
//!                 .client_type(ClientType::Confidential)
//!                 .grant_types(vec![GrantType::ClientCredentials])
//!                 .scopes(vec!["read".to_owned()])
//!                 .redirect_uri("https://app.example.com")
//!                 .build(),
//!         )
//!         .await?;
//!
//!     let flow = AuthenticationFlow::new(&config, store)?;
//!     let request =
//!         TokenRequest::new(&channel.client_id, channel.secret_key.as_str(), "client_credentials");
//!     let device = DeviceId::from_header(Some("device-123"))?;
//!     let token = flow.request_token(&request, &device, &CancellationToken::new()).await?;
//!
//!     let verified = flow.verify_token(&TokenVerifyRequest::new(&channel.client_id, token.token))?;
//!     assert_eq!(verified.scopes, vec!["read".to_owned()]);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module with configs, Ed25519 keys and JWT crafting.
//! - **`failpoints`**: Enables `fail_point!` injection in the issuer and the memory store.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Signing algorithm families.
pub mod algorithm;
/// Access token claims.
pub mod claims;
/// Service and signing configuration.
pub mod config;
/// Client credential generation.
pub mod credentials;
/// Authentication error types.
pub mod error;
/// Client-credentials authentication flow.
pub mod flow;
/// Access token issuance.
pub mod issuer;
/// Key loading per algorithm family.
pub mod keys;
/// Request and response payloads.
pub mod model;
/// Channel registration.
pub mod registry;
/// Response envelope and status codes.
pub mod response;
/// Shared test utilities.
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used, clippy::panic)]
pub mod testutil;
/// Access token verification.
pub mod verifier;

// Re-export key types for convenience
pub use algorithm::{AlgorithmFamily, FORBIDDEN_ALGORITHMS};
pub use claims::{ACCESS_TOKEN_TTL_SECS, TokenClaims};
pub use config::{AuthConfig, SigningConfig};
pub use error::{AuthError, ConfigError, Result, SigningError, TokenError};
pub use flow::{AuthenticationFlow, FlowStage};
pub use issuer::{IssuedToken, TokenIssuer};
pub use registry::ChannelRegistry;
pub use response::{ApiResponse, Status};
pub use verifier::TokenVerifier;
