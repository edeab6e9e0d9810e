// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider selection at startup.

use std::str::FromStr;
use std::sync::Arc;

use iambridge_config::model::IamConfig;
use iambridge_core::{IamError, IamProvider};
use iambridge_keycloak::KeycloakProvider;
use strum::{Display, EnumString, VariantNames};

/// Supported identity backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    Keycloak,
}

/// Build the provider named by `config.provider`.
///
/// Makes no network call; an unreachable backend surfaces later through
/// the health endpoint.
pub fn build_provider(config: &IamConfig) -> Result<Arc<dyn IamProvider>, IamError> {
    let name = config.provider.trim();
    let kind = ProviderKind::from_str(name).map_err(|_| {
        IamError::Config(format!(
            "unknown IAM provider `{name}` (supported: {})",
            ProviderKind::VARIANTS.join(", ")
        ))
    })?;

    match kind {
        ProviderKind::Keycloak => Ok(Arc::new(KeycloakProvider::new(&config.keycloak)?)),
    }
}
