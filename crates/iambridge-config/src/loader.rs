// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! File hierarchy: `./iambridge.toml` > `~/.config/iambridge/iambridge.toml`
//! > `/etc/iambridge/iambridge.toml`, with `IAMBRIDGE_*` environment
//! variables applied last.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BridgeConfig;

const ENV_PREFIX: &str = "IAMBRIDGE_";

/// Config files searched when no explicit path is given, lowest priority first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/iambridge/iambridge.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("iambridge/iambridge.toml"));
    }
    paths.push(PathBuf::from("iambridge.toml"));
    paths
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. Each file from [`search_paths`] that exists
/// 3. `IAMBRIDGE_*` environment variables
pub fn load_config() -> Result<BridgeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<BridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BridgeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BridgeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    search_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(BridgeConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Figment lowercases keys only after `map` runs, so the closure sees the
/// original `IAM_KEYCLOAK_CLIENT_SECRET` casing.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| env_key_path(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lower-cased, prefix-stripped env var name to its dotted config path.
///
/// Sections are matched explicitly rather than by splitting on `_`, because
/// field names contain underscores: `iam_keycloak_client_secret` must become
/// `iam.keycloak.client_secret`, not `iam.keycloak.client.secret`.
pub fn env_key_path(key: &str) -> String {
    const SECTIONS: [(&str, &str); 5] = [
        ("iam_keycloak_", "iam.keycloak."),
        ("security_cors_", "security.cors."),
        ("iam_", "iam."),
        ("app_", "app."),
        ("logging_", "logging."),
    ];

    SECTIONS
        .iter()
        .find_map(|(prefix, section)| {
            key.strip_prefix(prefix)
                .map(|rest| format!("{section}{rest}"))
        })
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_keep_underscored_field_names() {
        assert_eq!(
            env_key_path("iam_keycloak_client_secret"),
            "iam.keycloak.client_secret"
        );
        assert_eq!(env_key_path("iam_provider"), "iam.provider");
        assert_eq!(
            env_key_path("security_cors_allowed_origins"),
            "security.cors.allowed_origins"
        );
        assert_eq!(env_key_path("app_shutdown_timeout_secs"), "app.shutdown_timeout_secs");
        assert_eq!(env_key_path("logging_format"), "logging.format");
    }

    #[test]
    fn unknown_section_is_left_untouched() {
        assert_eq!(env_key_path("something_else"), "something_else");
    }

    #[test]
    fn search_paths_end_with_local_file() {
        let paths = search_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("/etc/iambridge/iambridge.toml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("iambridge.toml")));
    }
}
