// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Each handler validates its input, makes one provider call, and shapes the
//! result. Errors flow back as [`ApiError`].

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use iambridge_core::{TokenGrant, TokenInfo, UserInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::server::GatewayState;

/// JSON body extractor whose rejections render as `BAD_REQUEST`.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Path extractor whose rejections render as `BAD_REQUEST`.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Fails with `BAD_REQUEST` when `value` is blank.
fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    Ok(())
}

/// Request body for POST /api/v1/auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for POST /api/v1/auth/refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Request body for POST /api/v1/users/{id}/roles.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub role: String,
}

/// Response body for GET /api/v1/users/{id}/roles.
#[derive(Debug, Serialize, Deserialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 UTC.
    pub timestamp: String,
}

/// GET /health
pub async fn health(State(state): State<GatewayState>) -> Result<Json<HealthResponse>, ApiError> {
    state.provider.health_check().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    }))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<GatewayState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<TokenGrant>, ApiError> {
    require("username", &body.username)?;
    require("password", &body.password)?;
    let grant = state.provider.login(body.username.trim(), &body.password).await?;
    tracing::info!(username = body.username.trim(), "login succeeded");
    Ok(Json(grant))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<GatewayState>,
    BearerToken(token): BearerToken,
) -> Result<StatusCode, ApiError> {
    state.provider.logout(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<GatewayState>,
    ApiJson(body): ApiJson<RefreshRequest>,
) -> Result<Json<TokenGrant>, ApiError> {
    require("refresh_token", &body.refresh_token)?;
    let grant = state.provider.refresh_token(body.refresh_token.trim()).await?;
    Ok(Json(grant))
}

/// GET /api/v1/auth/validate
pub async fn validate(
    State(state): State<GatewayState>,
    BearerToken(token): BearerToken,
) -> Result<Json<TokenInfo>, ApiError> {
    let info = state.provider.validate_token(&token).await?;
    Ok(Json(info))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<GatewayState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<UserInfo>, ApiError> {
    let user = state.provider.get_user_info(&user_id).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/{id}
///
/// A body `id` must match the path id when present. Roles in the body are
/// managed through the role endpoints and ignored here.
pub async fn update_user(
    State(state): State<GatewayState>,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(mut body): ApiJson<UserInfo>,
) -> Result<StatusCode, ApiError> {
    if !body.id.trim().is_empty() && body.id.trim() != user_id {
        return Err(ApiError::bad_request("user id in body does not match path"));
    }
    if body.username.trim().is_empty() && body.email.trim().is_empty() {
        return Err(ApiError::bad_request("username or email is required"));
    }
    body.id = user_id.clone();
    state.provider.update_user_info(&user_id, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/{id}/roles
pub async fn assign_role(
    State(state): State<GatewayState>,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(body): ApiJson<RoleRequest>,
) -> Result<StatusCode, ApiError> {
    require("role", &body.role)?;
    state.provider.assign_role(&user_id, body.role.trim()).await?;
    tracing::info!(user_id, role = body.role.trim(), "role assigned");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/users/{id}/roles/{role}
pub async fn remove_role(
    State(state): State<GatewayState>,
    ApiPath((user_id, role)): ApiPath<(String, String)>,
) -> Result<StatusCode, ApiError> {
    require("role", &role)?;
    let role = role.trim();
    state.provider.remove_role(&user_id, role).await?;
    tracing::info!(user_id, role, "role removed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/{id}/roles
pub async fn get_user_roles(
    State(state): State<GatewayState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<RolesResponse>, ApiError> {
    let roles = state.provider.get_user_roles(&user_id).await?;
    Ok(Json(RolesResponse { roles }))
}
