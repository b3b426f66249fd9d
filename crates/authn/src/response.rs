//! User-visible response envelope and status codes.
//!
//! Every flow and registry outcome is reported as an [`ApiResponse`] whose
//! [`Status`] is derived from the typed result. The transport layer only
//! needs [`Status::http_status`] to pick the response code.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Outcome status carried in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The operation succeeded.
    Ok,
    /// Unknown channel or missing device context.
    Forbidden,
    /// Rejected credentials, grant or token.
    Unauthorized,
    /// Store, configuration or signing failure.
    UnexpectedError,
    /// The request body failed validation.
    InvalidPayload,
    /// A required parameter is missing.
    InvalidParameter,
    /// The presented token has expired.
    TokenExpired,
}

impl Status {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Forbidden => "FORBIDDEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnexpectedError => "UNEXPECTED_ERROR",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::TokenExpired => "TOKEN_EXPIRED",
        }
    }

    /// HTTP status code the transport layer should answer with.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Forbidden => 403,
            Self::Unauthorized | Self::TokenExpired => 401,
            Self::InvalidPayload | Self::InvalidParameter => 400,
            Self::UnexpectedError => 500,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Outcome status.
    pub status: Status,
    /// Human-readable message. Never contains internal error detail.
    pub message: String,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Builds a successful envelope.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self { status: Status::Ok, message: message.into(), data: Some(data) }
    }

    /// Builds a failure envelope from an [`AuthError`].
    #[must_use]
    pub fn from_error(err: &AuthError) -> Self {
        Self { status: err.status(), message: err.public_message(), data: None }
    }

    /// Converts a flow or registry result into an envelope.
    ///
    /// `success_message` is used for the `Ok` case; errors carry their
    /// public message only.
    pub fn from_result(result: Result<T, AuthError>, success_message: &str) -> Self {
        match result {
            Ok(data) => Self::ok(success_message, data),
            Err(err) => Self::from_error(&err),
        }
    }

    /// Returns `true` if the status is [`Status::Ok`].
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
