// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer token extraction.
//!
//! Rejects a request with `INVALID_TOKEN` before any provider call when the
//! `Authorization` header is missing or carries no token.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use iambridge_core::IamError;

use crate::error::ApiError;

/// The token presented in the `Authorization` header.
pub struct BearerToken(pub String);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([redacted])")
    }
}

/// Returns the token in an `Authorization` header value.
///
/// The `Bearer ` prefix is stripped when present; a bare token is accepted
/// as-is. Blank values yield `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(|token| Self(token.to_string()))
            .ok_or(ApiError(IamError::TokenInvalid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_bearer_prefix() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
    }

    #[test]
    fn accepts_bare_token() {
        assert_eq!(bearer_token("abc.def"), Some("abc.def"));
    }

    #[test]
    fn rejects_blank_values() {
        assert_eq!(bearer_token(""), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer    "), None);
    }

    #[test]
    fn debug_redacts_token() {
        let token = BearerToken("secret".into());
        assert!(!format!("{token:?}").contains("secret"));
    }

    proptest! {
        #[test]
        fn prefixed_token_round_trips(token in "[A-Za-z0-9._~+/=-]{1,64}") {
            let header = format!("Bearer {token}");
            prop_assert_eq!(bearer_token(&header), Some(token.as_str()));
        }

        #[test]
        fn extracted_token_is_never_blank(header in "\\PC{0,40}") {
            if let Some(token) = bearer_token(&header) {
                prop_assert!(!token.trim().is_empty());
            }
        }
    }
}
