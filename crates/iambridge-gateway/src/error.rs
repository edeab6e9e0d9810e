// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from provider errors to HTTP responses.
//!
//! This is the only place an [`IamError`] becomes a status code and body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use iambridge_core::{ErrorKind, IamError};
use serde::{Deserialize, Serialize};

use crate::middleware::current_request_id;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub request_id: String,
}

impl ErrorBody {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            code: kind.to_string(),
            message: message.into(),
            request_id: current_request_id().unwrap_or_default(),
        }
    }
}

/// Handler error wrapping an [`IamError`].
#[derive(Debug)]
pub struct ApiError(pub IamError);

impl From<IamError> for ApiError {
    fn from(err: IamError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(IamError::BadRequest(message.into()))
    }
}

/// HTTP status for an error class.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidCredentials | ErrorKind::TokenExpired | ErrorKind::TokenInvalid => {
            StatusCode::UNAUTHORIZED
        }
        ErrorKind::UserNotFound | ErrorKind::RoleNotFound => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Transport => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing message. Server-side failures never expose their detail.
fn public_message(err: &IamError) -> String {
    match err {
        IamError::InvalidCredentials => "invalid username or password".into(),
        IamError::TokenExpired => "token has expired".into(),
        IamError::TokenInvalid => "missing or invalid token".into(),
        IamError::UserNotFound { .. } => "user not found".into(),
        IamError::RoleNotFound { .. } => "role not found".into(),
        IamError::BadRequest(message) => message.clone(),
        IamError::Unavailable { .. } => "identity provider is unavailable".into(),
        IamError::Transport { .. } | IamError::Config(_) => "internal server error".into(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            tracing::error!(code = %kind, error = %self.0, "request failed");
        } else {
            tracing::debug!(code = %kind, error = %self.0, "request rejected");
        }

        let body = ErrorBody::new(kind, public_message(&self.0));
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_expected_status() {
        assert_eq!(status_for(ErrorKind::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::TokenInvalid), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::RoleNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::BadRequest), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_for(ErrorKind::Transport), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn transport_detail_is_not_exposed() {
        let err = IamError::unexpected_status("login", 502);
        assert_eq!(public_message(&err), "internal server error");
    }

    #[test]
    fn bad_request_keeps_detail() {
        let err = IamError::BadRequest("username is required".into());
        assert_eq!(public_message(&err), "username is required");
    }

    #[test]
    fn body_outside_request_scope_has_empty_request_id() {
        let body = ErrorBody::new(ErrorKind::UserNotFound, "user not found");
        assert_eq!(body.code, "USER_NOT_FOUND");
        assert!(body.request_id.is_empty());
    }
}
