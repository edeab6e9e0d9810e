// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Keycloak OIDC and admin REST APIs.

use serde::{Deserialize, Serialize};

/// Successful response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// OAuth2 error body, e.g. `{"error":"invalid_grant","error_description":"..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Subset of the admin API `UserRepresentation` the bridge reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRepresentation {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Only populated by some Keycloak versions and export paths.
    #[serde(default)]
    pub realm_roles: Vec<String>,
}

/// Partial `UserRepresentation` sent on update. Absent fields are left
/// untouched by Keycloak.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Admin API `RoleRepresentation`. Role mappings are matched by `id`,
/// so the full representation must be resolved before mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRepresentation {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_representation_reads_camel_case_roles() {
        let json = r#"{
            "id": "8f1c",
            "username": "alice",
            "email": "alice@example.com",
            "enabled": true,
            "realmRoles": ["admin", "user"]
        }"#;
        let user: UserRepresentation = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "8f1c");
        assert_eq!(user.realm_roles, vec!["admin", "user"]);
    }

    #[test]
    fn user_update_skips_absent_fields() {
        let update = UserUpdate {
            username: None,
            email: Some("new@example.com".into()),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"email": "new@example.com"}));
    }

    #[test]
    fn role_representation_ignores_extra_fields() {
        let json = r#"{"id": "r-1", "name": "admin", "composite": false, "clientRole": false}"#;
        let role: RoleRepresentation = serde_json::from_str(json).unwrap();
        assert_eq!(role.name, "admin");
    }
}
