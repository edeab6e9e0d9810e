// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The provider contract every identity backend must satisfy.

use async_trait::async_trait;

use crate::error::IamError;
use crate::types::{TokenGrant, TokenInfo, UserInfo};

/// Capability set of a backend identity-and-access-management system.
///
/// Exactly one implementation is active per process. Implementations must be
/// safe to share across concurrent requests. Dropping a returned future aborts
/// any outbound call it has in flight, so request cancellation propagates
/// without an explicit context argument.
#[async_trait]
pub trait IamProvider: Send + Sync + 'static {
    /// Short lower-case name of the backend, e.g. `keycloak`.
    fn name(&self) -> &str;

    /// Exchanges a username and password for tokens.
    async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, IamError>;

    /// Ends the session identified by `token`.
    async fn logout(&self, token: &str) -> Result<(), IamError>;

    /// Resolves an access token into the identity it represents.
    async fn validate_token(&self, token: &str) -> Result<TokenInfo, IamError>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, IamError>;

    /// Fetches a user record. `roles` holds the same names
    /// [`get_user_roles`](Self::get_user_roles) returns.
    async fn get_user_info(&self, user_id: &str) -> Result<UserInfo, IamError>;

    /// Updates the mutable profile fields of a user. Roles are managed
    /// through the role operations and are ignored here.
    async fn update_user_info(&self, user_id: &str, user: &UserInfo) -> Result<(), IamError>;

    async fn assign_role(&self, user_id: &str, role: &str) -> Result<(), IamError>;

    async fn remove_role(&self, user_id: &str, role: &str) -> Result<(), IamError>;

    /// Lists the role names granted to a user, in backend order.
    async fn get_user_roles(&self, user_id: &str) -> Result<Vec<String>, IamError>;

    /// Checks backend liveness. Every failure is reported as
    /// [`IamError::Unavailable`].
    async fn health_check(&self) -> Result<(), IamError>;
}
