// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities for the IAM bridge.
//!
//! Provides [`MockProvider`], an in-memory [`IamProvider`](iambridge_core::IamProvider),
//! and helpers for building test configurations.

pub mod mock_provider;

pub use mock_provider::MockProvider;

use iambridge_config::model::{BridgeConfig, KeycloakConfig};

/// A configuration that passes validation and points Keycloak at `base_url`.
pub fn test_config(base_url: &str) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.iam.keycloak = KeycloakConfig {
        base_url: base_url.to_string(),
        realm: "test".into(),
        client_id: "iambridge".into(),
        client_secret: "test-secret".into(),
        ..KeycloakConfig::default()
    };
    config
}
