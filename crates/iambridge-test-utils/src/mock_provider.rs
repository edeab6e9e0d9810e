// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory identity provider for deterministic testing.
//!
//! `MockProvider` implements the full provider contract over a small user
//! store so gateway tests run without a real identity backend.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use iambridge_core::{IamError, IamProvider, TokenGrant, TokenInfo, UserInfo};

/// Lifetime reported for issued access tokens.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 300;

#[derive(Default)]
struct Store {
    users: HashMap<String, UserInfo>,
    passwords: HashMap<String, (String, String)>,
    roles: BTreeSet<String>,
    access_tokens: HashMap<String, String>,
    refresh_tokens: HashMap<String, String>,
    issued: u64,
}

impl Store {
    fn issue(&mut self, user_id: &str) -> TokenGrant {
        self.issued += 1;
        let access = format!("access-{}", self.issued);
        let refresh = format!("refresh-{}", self.issued);
        self.access_tokens.insert(access.clone(), user_id.to_string());
        self.refresh_tokens.insert(refresh.clone(), user_id.to_string());
        TokenGrant {
            token: access,
            refresh_token: Some(refresh),
            expires_in: Some(ACCESS_TOKEN_TTL_SECS),
        }
    }

    fn user_mut(&mut self, user_id: &str) -> Result<&mut UserInfo, IamError> {
        self.users.get_mut(user_id).ok_or_else(|| IamError::UserNotFound {
            user_id: user_id.to_string(),
        })
    }
}

/// An in-memory provider with users, passwords, realm roles and a health switch.
///
/// Every contract call increments [`MockProvider::calls`], which lets tests
/// assert that the gateway rejected a request before reaching the provider.
#[derive(Clone)]
pub struct MockProvider {
    store: Arc<Mutex<Store>>,
    healthy: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create an empty, healthy provider.
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            healthy: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register a user that can log in with `password`.
    pub async fn add_user(&self, user: UserInfo, password: &str) {
        let mut store = self.store.lock().await;
        for role in &user.roles {
            store.roles.insert(role.clone());
        }
        store
            .passwords
            .insert(user.username.clone(), (password.to_string(), user.id.clone()));
        store.users.insert(user.id.clone(), user);
    }

    /// Register a realm role that can be assigned.
    pub async fn add_role(&self, role: &str) {
        self.store.lock().await.roles.insert(role.to_string());
    }

    /// Toggle the result of `health_check`.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Number of contract calls made so far, `name` excluded.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of a stored user.
    pub async fn user(&self, user_id: &str) -> Option<UserInfo> {
        self.store.lock().await.users.get(user_id).cloned()
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IamProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, IamError> {
        self.record();
        let mut store = self.store.lock().await;
        let user_id = match store.passwords.get(username) {
            Some((expected, user_id)) if expected == password => user_id.clone(),
            _ => return Err(IamError::InvalidCredentials),
        };
        Ok(store.issue(&user_id))
    }

    async fn logout(&self, token: &str) -> Result<(), IamError> {
        self.record();
        let mut store = self.store.lock().await;
        if store.refresh_tokens.remove(token).is_none() && store.access_tokens.remove(token).is_none()
        {
            return Err(IamError::TokenInvalid);
        }
        Ok(())
    }

    async fn validate_token(&self, token: &str) -> Result<TokenInfo, IamError> {
        self.record();
        let store = self.store.lock().await;
        let user = store
            .access_tokens
            .get(token)
            .and_then(|user_id| store.users.get(user_id))
            .ok_or(IamError::TokenInvalid)?;

        let mut claims = HashMap::new();
        claims.insert("sub".to_string(), serde_json::Value::from(user.id.clone()));
        claims.insert(
            "preferred_username".to_string(),
            serde_json::Value::from(user.username.clone()),
        );

        Ok(TokenInfo {
            user_id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            claims,
            expires_at: Some(Utc::now() + Duration::seconds(ACCESS_TOKEN_TTL_SECS as i64)),
        })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenGrant, IamError> {
        self.record();
        let mut store = self.store.lock().await;
        let user_id = store
            .refresh_tokens
            .remove(refresh_token)
            .ok_or(IamError::TokenExpired)?;
        Ok(store.issue(&user_id))
    }

    async fn get_user_info(&self, user_id: &str) -> Result<UserInfo, IamError> {
        self.record();
        let mut store = self.store.lock().await;
        store.user_mut(user_id).map(|user| user.clone())
    }

    async fn update_user_info(&self, user_id: &str, user: &UserInfo) -> Result<(), IamError> {
        self.record();
        let mut store = self.store.lock().await;
        let stored = store.user_mut(user_id)?;
        if !user.username.is_empty() {
            stored.username = user.username.clone();
        }
        if !user.email.is_empty() {
            stored.email = user.email.clone();
        }
        Ok(())
    }

    async fn assign_role(&self, user_id: &str, role: &str) -> Result<(), IamError> {
        self.record();
        let mut store = self.store.lock().await;
        if !store.roles.contains(role) {
            return Err(IamError::RoleNotFound {
                role: role.to_string(),
            });
        }
        let user = store.user_mut(user_id)?;
        if !user.roles.iter().any(|r| r == role) {
            user.roles.push(role.to_string());
        }
        Ok(())
    }

    async fn remove_role(&self, user_id: &str, role: &str) -> Result<(), IamError> {
        self.record();
        let mut store = self.store.lock().await;
        if !store.roles.contains(role) {
            return Err(IamError::RoleNotFound {
                role: role.to_string(),
            });
        }
        store.user_mut(user_id)?.roles.retain(|r| r != role);
        Ok(())
    }

    async fn get_user_roles(&self, user_id: &str) -> Result<Vec<String>, IamError> {
        self.record();
        let mut store = self.store.lock().await;
        store.user_mut(user_id).map(|user| user.roles.clone())
    }

    async fn health_check(&self) -> Result<(), IamError> {
        self.record();
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(IamError::unavailable("mock provider marked unhealthy"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserInfo {
        UserInfo {
            id: "u-1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            roles: vec!["user".into()],
        }
    }

    #[tokio::test]
    async fn login_then_validate() {
        let provider = MockProvider::new();
        provider.add_user(alice(), "pw").await;

        let grant = provider.login("alice", "pw").await.unwrap();
        let info = provider.validate_token(&grant.token).await.unwrap();
        assert_eq!(info.user_id, "u-1");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let provider = MockProvider::new();
        provider.add_user(alice(), "pw").await;
        assert!(matches!(
            provider.login("alice", "nope").await,
            Err(IamError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn refresh_token_is_single_use() {
        let provider = MockProvider::new();
        provider.add_user(alice(), "pw").await;
        let grant = provider.login("alice", "pw").await.unwrap();
        let refresh = grant.refresh_token.unwrap();

        provider.refresh_token(&refresh).await.unwrap();
        assert!(matches!(
            provider.refresh_token(&refresh).await,
            Err(IamError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn assign_is_idempotent_and_remove_clears() {
        let provider = MockProvider::new();
        provider.add_user(alice(), "pw").await;
        provider.add_role("admin").await;

        provider.assign_role("u-1", "admin").await.unwrap();
        provider.assign_role("u-1", "admin").await.unwrap();
        assert_eq!(provider.get_user_roles("u-1").await.unwrap(), vec!["user", "admin"]);

        provider.remove_role("u-1", "admin").await.unwrap();
        assert_eq!(provider.get_user_roles("u-1").await.unwrap(), vec!["user"]);
    }

    #[tokio::test]
    async fn health_follows_switch() {
        let provider = MockProvider::new();
        assert!(provider.health_check().await.is_ok());
        provider.set_healthy(false);
        assert!(matches!(
            provider.health_check().await,
            Err(IamError::Unavailable { .. })
        ));
    }
}
