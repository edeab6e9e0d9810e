// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types returned by provider operations.
//!
//! These are terminal response values: they hold no references to other
//! entities and are never cached or persisted by the bridge.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tokens issued by a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// The access token. Never empty on success.
    pub token: String,
    /// Refresh token, when the backend issued one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds, when the backend reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl TokenGrant {
    /// A grant carrying only an access token.
    pub fn access_only(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: None,
            expires_in: None,
        }
    }
}

/// Identity resolved from a validated access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    /// Every claim the backend returned, including the ones mapped above.
    #[serde(default)]
    pub claims: HashMap<String, serde_json::Value>,
    /// Token expiry as unix seconds, when the backend reports it.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// A user record as exposed by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_grant_omits_absent_fields() {
        let json = serde_json::to_value(TokenGrant::access_only("abc")).unwrap();
        assert_eq!(json, serde_json::json!({"token": "abc"}));
    }

    #[test]
    fn token_info_serializes_expiry_as_unix_seconds() {
        let info = TokenInfo {
            user_id: "u-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            roles: vec!["admin".into()],
            claims: HashMap::new(),
            expires_at: DateTime::from_timestamp(1_700_000_000, 0),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["expires_at"], 1_700_000_000);
        assert_eq!(json["user_id"], "u-1");
    }

    #[test]
    fn user_info_accepts_partial_body() {
        let user: UserInfo = serde_json::from_str(r#"{"email": "bob@example.com"}"#).unwrap();
        assert_eq!(user.email, "bob@example.com");
        assert!(user.id.is_empty());
        assert!(user.roles.is_empty());
    }
}
