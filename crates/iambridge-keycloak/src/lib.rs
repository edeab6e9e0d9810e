// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keycloak provider adapter for the IAM bridge.
//!
//! Implements [`IamProvider`] against a Keycloak realm: OIDC token, userinfo
//! and logout endpoints for the session lifecycle, and the admin REST API for
//! user and realm-role management. Admin calls authenticate with a
//! service-account token from a `client_credentials` grant.
//!
//! Each contract call makes a single attempt. There is no retry, caching, or
//! background refresh; every request is bounded by the client timeout.

pub mod endpoints;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use iambridge_config::model::KeycloakConfig;
use iambridge_core::{IamError, IamProvider, TokenGrant, TokenInfo, UserInfo};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::endpoints::Endpoints;
use crate::types::{
    OAuthErrorResponse, RoleRepresentation, TokenResponse, UserRepresentation, UserUpdate,
};

/// Identity provider backed by a Keycloak realm.
pub struct KeycloakProvider {
    client: reqwest::Client,
    endpoints: Endpoints,
    client_id: String,
    client_secret: SecretString,
}

impl std::fmt::Debug for KeycloakProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakProvider")
            .field("endpoints", &self.endpoints)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

impl KeycloakProvider {
    /// Creates a provider using `timeout_secs` from the configuration.
    ///
    /// Fails if any required field is empty. No network call is made.
    pub fn new(config: &KeycloakConfig) -> Result<Self, IamError> {
        Self::with_timeout(config, Duration::from_secs(config.timeout_secs))
    }

    /// Creates a provider with an explicit per-request timeout.
    pub fn with_timeout(config: &KeycloakConfig, timeout: Duration) -> Result<Self, IamError> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(IamError::Config(format!(
                "missing required keycloak configuration: {}",
                missing.join(", ")
            )));
        }

        let endpoints = Endpoints::new(
            &config.base_url,
            &config.realm,
            config.health_path.as_deref(),
        )?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IamError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoints,
            client_id: config.client_id.trim().to_string(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// Sends a request, converting connection failures and timeouts into
    /// transport errors.
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response, IamError> {
        let response = request.send().await.map_err(|e| IamError::Transport {
            message: format!("{operation}: request failed: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;
        debug!(operation, status = %response.status(), "keycloak response received");
        Ok(response)
    }

    /// Runs a token-endpoint grant with client authentication.
    async fn grant(
        &self,
        operation: &'static str,
        params: &[(&str, &str)],
    ) -> Result<Response, IamError> {
        let mut form = vec![
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
        ];
        form.extend_from_slice(params);
        self.send(operation, self.client.post(self.endpoints.token()).form(&form))
            .await
    }

    /// Obtains a service-account token for admin API calls.
    async fn admin_token(&self) -> Result<String, IamError> {
        let response = self
            .grant("admin_token", &[("grant_type", "client_credentials")])
            .await?;
        match response.status() {
            StatusCode::OK => {
                let token: TokenResponse = decode("admin_token", response).await?;
                Ok(token.access_token)
            }
            status => Err(unexpected("admin_token", status)),
        }
    }

    /// Resolves a realm role by name.
    async fn realm_role(&self, admin_token: &str, role: &str) -> Result<RoleRepresentation, IamError> {
        let response = self
            .send(
                "get_role",
                self.client
                    .get(self.endpoints.realm_role(role))
                    .bearer_auth(admin_token),
            )
            .await?;
        match response.status() {
            StatusCode::OK => decode("get_role", response).await,
            StatusCode::NOT_FOUND => Err(IamError::RoleNotFound {
                role: role.to_string(),
            }),
            status => Err(unexpected("get_role", status)),
        }
    }

    /// Names of the realm roles mapped directly to a user.
    async fn realm_role_names(
        &self,
        operation: &'static str,
        admin_token: &str,
        user_id: &str,
    ) -> Result<Vec<String>, IamError> {
        let response = self
            .send(
                operation,
                self.client
                    .get(self.endpoints.realm_role_mappings(user_id))
                    .bearer_auth(admin_token),
            )
            .await?;
        match response.status() {
            StatusCode::OK => {
                let roles: Vec<RoleRepresentation> = decode(operation, response).await?;
                Ok(roles.into_iter().map(|role| role.name).collect())
            }
            StatusCode::NOT_FOUND => Err(user_not_found(user_id)),
            status => Err(unexpected(operation, status)),
        }
    }

    /// Adds or removes one realm-role mapping.
    async fn change_role_mapping(
        &self,
        operation: &'static str,
        user_id: &str,
        role: &str,
        assign: bool,
    ) -> Result<(), IamError> {
        let admin_token = self.admin_token().await?;
        let representation = self.realm_role(&admin_token, role).await?;
        let url = self.endpoints.realm_role_mappings(user_id);
        let request = if assign {
            self.client.post(url)
        } else {
            self.client.delete(url)
        };

        let response = self
            .send(
                operation,
                request.bearer_auth(&admin_token).json(&[representation]),
            )
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(user_not_found(user_id)),
            status => Err(unexpected(operation, status)),
        }
    }
}

#[async_trait]
impl IamProvider for KeycloakProvider {
    fn name(&self) -> &str {
        "keycloak"
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, IamError> {
        let response = self
            .grant(
                "login",
                &[
                    ("grant_type", "password"),
                    ("username", username),
                    ("password", password),
                ],
            )
            .await?;
        match response.status() {
            StatusCode::OK => into_grant("login", decode("login", response).await?),
            StatusCode::UNAUTHORIZED => Err(IamError::InvalidCredentials),
            status => Err(unexpected("login", status)),
        }
    }

    async fn logout(&self, token: &str) -> Result<(), IamError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("refresh_token", token),
        ];
        let response = self
            .send(
                "logout",
                self.client.post(self.endpoints.logout()).form(&form),
            )
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(IamError::TokenInvalid),
            StatusCode::BAD_REQUEST => {
                if is_invalid_grant(response).await {
                    Err(IamError::TokenInvalid)
                } else {
                    Err(unexpected("logout", StatusCode::BAD_REQUEST))
                }
            }
            status => Err(unexpected("logout", status)),
        }
    }

    async fn validate_token(&self, token: &str) -> Result<TokenInfo, IamError> {
        let response = self
            .send(
                "validate_token",
                self.client.get(self.endpoints.userinfo()).bearer_auth(token),
            )
            .await?;
        match response.status() {
            StatusCode::OK => {
                let claims: serde_json::Map<String, serde_json::Value> =
                    decode("validate_token", response).await?;
                token_info_from_claims(claims)
            }
            StatusCode::UNAUTHORIZED => Err(IamError::TokenInvalid),
            status => Err(unexpected("validate_token", status)),
        }
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, IamError> {
        let response = self
            .grant(
                "refresh_token",
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                ],
            )
            .await?;
        match response.status() {
            StatusCode::OK => into_grant("refresh_token", decode("refresh_token", response).await?),
            StatusCode::UNAUTHORIZED => Err(IamError::TokenExpired),
            // Keycloak answers an inactive refresh token with 400 invalid_grant.
            StatusCode::BAD_REQUEST => {
                if is_invalid_grant(response).await {
                    Err(IamError::TokenExpired)
                } else {
                    Err(unexpected("refresh_token", StatusCode::BAD_REQUEST))
                }
            }
            status => Err(unexpected("refresh_token", status)),
        }
    }

    async fn get_user_info(&self, user_id: &str) -> Result<UserInfo, IamError> {
        let admin_token = self.admin_token().await?;
        let response = self
            .send(
                "get_user_info",
                self.client
                    .get(self.endpoints.user(user_id))
                    .bearer_auth(&admin_token),
            )
            .await?;
        match response.status() {
            StatusCode::OK => {
                let user: UserRepresentation = decode("get_user_info", response).await?;
                // The user representation omits realmRoles on current Keycloak.
                let roles = if user.realm_roles.is_empty() {
                    self.realm_role_names("get_user_info", &admin_token, user_id)
                        .await?
                } else {
                    user.realm_roles
                };
                Ok(UserInfo {
                    id: user.id,
                    username: user.username,
                    email: user.email.unwrap_or_default(),
                    roles,
                })
            }
            StatusCode::NOT_FOUND => Err(user_not_found(user_id)),
            status => Err(unexpected("get_user_info", status)),
        }
    }

    async fn update_user_info(&self, user_id: &str, user: &UserInfo) -> Result<(), IamError> {
        let update = UserUpdate {
            username: non_empty(&user.username),
            email: non_empty(&user.email),
        };
        let admin_token = self.admin_token().await?;
        let response = self
            .send(
                "update_user_info",
                self.client
                    .put(self.endpoints.user(user_id))
                    .bearer_auth(&admin_token)
                    .json(&update),
            )
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(user_not_found(user_id)),
            StatusCode::CONFLICT => Err(IamError::BadRequest(
                "username or email already belongs to another user".to_string(),
            )),
            status => Err(unexpected("update_user_info", status)),
        }
    }

    async fn assign_role(&self, user_id: &str, role: &str) -> Result<(), IamError> {
        self.change_role_mapping("assign_role", user_id, role, true)
            .await
    }

    async fn remove_role(&self, user_id: &str, role: &str) -> Result<(), IamError> {
        self.change_role_mapping("remove_role", user_id, role, false)
            .await
    }

    async fn get_user_roles(&self, user_id: &str) -> Result<Vec<String>, IamError> {
        let admin_token = self.admin_token().await?;
        self.realm_role_names("get_user_roles", &admin_token, user_id)
            .await
    }

    async fn health_check(&self) -> Result<(), IamError> {
        let response = self
            .client
            .get(self.endpoints.health())
            .send()
            .await
            .map_err(|e| IamError::Unavailable {
                message: format!("health check failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(operation = "health_check", status = %status, "keycloak response received");
        if status.is_success() {
            Ok(())
        } else {
            warn!(status = %status, "keycloak health check returned non-success status");
            Err(IamError::unavailable(format!(
                "health check returned status {status}"
            )))
        }
    }
}

/// Reads and deserializes a JSON response body.
async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T, IamError> {
    let body = response.text().await.map_err(|e| IamError::Transport {
        message: format!("{operation}: failed to read response body: {e}"),
        status: None,
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| IamError::Transport {
        message: format!("{operation}: failed to decode response: {e}"),
        status: None,
        source: Some(Box::new(e)),
    })
}

fn unexpected(operation: &'static str, status: StatusCode) -> IamError {
    warn!(operation, status = %status, "unexpected keycloak status");
    IamError::unexpected_status(operation, status.as_u16())
}

fn user_not_found(user_id: &str) -> IamError {
    IamError::UserNotFound {
        user_id: user_id.to_string(),
    }
}

/// True when an error body carries the OAuth2 `invalid_grant` code.
async fn is_invalid_grant(response: Response) -> bool {
    match response.text().await {
        Ok(body) => serde_json::from_str::<OAuthErrorResponse>(&body)
            .map(|err| {
                debug!(
                    error = %err.error,
                    description = err.error_description.as_deref().unwrap_or(""),
                    "keycloak grant rejected"
                );
                err.error == "invalid_grant"
            })
            .unwrap_or(false),
        Err(_) => false,
    }
}

fn into_grant(operation: &'static str, token: TokenResponse) -> Result<TokenGrant, IamError> {
    if token.access_token.is_empty() {
        return Err(IamError::transport(format!(
            "{operation}: backend returned an empty access token"
        )));
    }
    Ok(TokenGrant {
        token: token.access_token,
        refresh_token: token.refresh_token,
        expires_in: token.expires_in,
    })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Maps a userinfo claim set onto [`TokenInfo`].
///
/// Roles come from `realm_access.roles`; every claim is kept in `claims`.
fn token_info_from_claims(
    claims: serde_json::Map<String, serde_json::Value>,
) -> Result<TokenInfo, IamError> {
    let string_claim = |name: &str| {
        claims
            .get(name)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let user_id = string_claim("sub");
    if user_id.is_empty() {
        return Err(IamError::transport(
            "validate_token: userinfo response has no subject",
        ));
    }

    let roles = claims
        .get("realm_access")
        .and_then(|access| access.get("roles"))
        .and_then(serde_json::Value::as_array)
        .map(|roles| {
            roles
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let expires_at = claims
        .get("exp")
        .and_then(serde_json::Value::as_i64)
        .and_then(|exp| DateTime::from_timestamp(exp, 0));

    let username = string_claim("preferred_username");
    let email = string_claim("email");

    Ok(TokenInfo {
        user_id,
        username,
        email,
        roles,
        expires_at,
        claims: claims.into_iter().collect(),
    })
}
