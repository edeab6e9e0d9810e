// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy shared by every provider adapter and the gateway.

use strum::{Display, EnumString};
use thiserror::Error;

/// The error type returned by every [`IamProvider`](crate::IamProvider) operation.
///
/// Adapters convert each non-success backend outcome into one of these
/// variants; the gateway maps them onto HTTP responses in a single place.
#[derive(Debug, Error)]
pub enum IamError {
    /// The backend rejected the supplied username/password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A refresh token was rejected as expired or revoked.
    #[error("token expired")]
    TokenExpired,

    /// An access token was rejected, or no usable bearer token was supplied.
    #[error("token invalid")]
    TokenInvalid,

    /// The backend has no user with this identifier.
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: String },

    /// The backend has no role with this name.
    #[error("role not found: {role}")]
    RoleNotFound { role: String },

    /// The inbound request was malformed or missed a required field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The backend failed its liveness check.
    #[error("provider unavailable: {message}")]
    Unavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network failure, undecodable body, or an unexpected backend status.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Provider selection or construction failed at startup.
    #[error("configuration error: {0}")]
    Config(String),
}

impl IamError {
    /// Builds a [`IamError::Transport`] without status or source.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Builds a [`IamError::Transport`] for an unexpected backend status code.
    pub fn unexpected_status(operation: &str, status: u16) -> Self {
        Self::Transport {
            message: format!("{operation}: unexpected status code {status}"),
            status: Some(status),
            source: None,
        }
    }

    /// Builds a [`IamError::Unavailable`] without a source.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Classifies this error into the public taxonomy.
    ///
    /// `Config` never legitimately reaches a request path, so it falls into
    /// the catch-all `Transport` class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::TokenExpired => ErrorKind::TokenExpired,
            Self::TokenInvalid => ErrorKind::TokenInvalid,
            Self::UserNotFound { .. } => ErrorKind::UserNotFound,
            Self::RoleNotFound { .. } => ErrorKind::RoleNotFound,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
            Self::Transport { .. } | Self::Config(_) => ErrorKind::Transport,
        }
    }
}

/// Public error classes, serialized as the `code` field of API error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidCredentials,
    TokenExpired,
    #[strum(serialize = "INVALID_TOKEN")]
    TokenInvalid,
    UserNotFound,
    RoleNotFound,
    BadRequest,
    #[strum(serialize = "SERVICE_UNAVAILABLE")]
    Unavailable,
    #[strum(serialize = "INTERNAL_SERVER_ERROR")]
    Transport,
}
