// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! URL construction for the Keycloak realm and admin endpoints.
//!
//! Every dynamic value (realm, user id, role name) is appended as an encoded
//! path segment, never formatted into the URL string.

use iambridge_core::IamError;
use reqwest::Url;

#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    realm: String,
    health_segments: Option<Vec<String>>,
}

impl Endpoints {
    pub fn new(base_url: &str, realm: &str, health_path: Option<&str>) -> Result<Self, IamError> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| IamError::Config(format!("invalid keycloak base_url `{base_url}`: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(IamError::Config(format!(
                "keycloak base_url `{base_url}` cannot carry a path"
            )));
        }

        let health_segments = health_path.map(|path| {
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect()
        });

        Ok(Self {
            base,
            realm: realm.trim().to_string(),
            health_segments,
        })
    }

    fn join(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn oidc(&self, leaf: &str) -> Url {
        self.join(&["realms", &self.realm, "protocol", "openid-connect", leaf])
    }

    pub fn token(&self) -> Url {
        self.oidc("token")
    }

    pub fn userinfo(&self) -> Url {
        self.oidc("userinfo")
    }

    pub fn logout(&self) -> Url {
        self.oidc("logout")
    }

    pub fn user(&self, user_id: &str) -> Url {
        self.join(&["admin", "realms", &self.realm, "users", user_id])
    }

    pub fn realm_role(&self, role: &str) -> Url {
        self.join(&["admin", "realms", &self.realm, "roles", role])
    }

    pub fn realm_role_mappings(&self, user_id: &str) -> Url {
        self.join(&[
            "admin",
            "realms",
            &self.realm,
            "users",
            user_id,
            "role-mappings",
            "realm",
        ])
    }

    /// Liveness check target: the configured path, or the realm discovery document.
    pub fn health(&self) -> Url {
        match &self.health_segments {
            Some(segments) => {
                let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
                self.join(&segments)
            }
            None => self.join(&["realms", &self.realm, ".well-known", "openid-configuration"]),
        }
    }
}
