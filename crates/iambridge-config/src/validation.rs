// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::BridgeConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.app.host.trim();
    if host.is_empty() {
        fail("app.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!("app.host `{host}` is not a valid IP address or hostname"));
    }

    if config.app.port == 0 {
        fail("app.port must be between 1 and 65535".to_string());
    }

    if config.app.shutdown_timeout_secs == 0 {
        fail("app.shutdown_timeout_secs must be greater than 0".to_string());
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of: {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    let format = config.logging.format.to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        fail(format!(
            "logging.format `{}` is not one of: {}",
            config.logging.format,
            LOG_FORMATS.join(", ")
        ));
    }

    match config.iam.current_provider().as_str() {
        "keycloak" => {
            let keycloak = &config.iam.keycloak;
            for field in keycloak.missing_fields() {
                fail(format!("iam.keycloak.{field} must not be empty"));
            }
            if keycloak.timeout_secs == 0 {
                fail("iam.keycloak.timeout_secs must be greater than 0".to_string());
            }
            if !keycloak.base_url.trim().is_empty()
                && !keycloak.base_url.starts_with("http://")
                && !keycloak.base_url.starts_with("https://")
            {
                fail(format!(
                    "iam.keycloak.base_url `{}` must start with http:// or https://",
                    keycloak.base_url
                ));
            }
        }
        "" => fail("iam.provider must not be empty".to_string()),
        other => fail(format!("iam.provider `{other}` is not a supported provider")),
    }

    for origin in &config.security.cors.allowed_origins {
        if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
            fail(format!(
                "security.cors.allowed_origins entry `{origin}` must be `*` or an http(s) origin"
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> BridgeConfig {
        let mut config = BridgeConfig::default();
        config.iam.keycloak.base_url = "https://sso.example.com".to_string();
        config.iam.keycloak.realm = "main".to_string();
        config.iam.keycloak.client_id = "bridge".to_string();
        config.iam.keycloak.client_secret = "secret".into();
        config
    }

    fn messages(config: &BridgeConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn complete_config_validates() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn default_config_reports_every_missing_keycloak_field() {
        let msgs = messages(&BridgeConfig::default());
        for field in ["base_url", "realm", "client_id", "client_secret"] {
            assert!(
                msgs.iter().any(|m| m.contains(&format!("iam.keycloak.{field}"))),
                "missing report for {field}: {msgs:?}"
            );
        }
    }

    #[test]
    fn unknown_provider_fails() {
        let mut config = valid_config();
        config.iam.provider = "okta".to_string();
        let msgs = messages(&config);
        assert!(msgs.iter().any(|m| m.contains("`okta` is not a supported provider")));
    }

    #[test]
    fn provider_name_is_case_insensitive() {
        let mut config = valid_config();
        config.iam.provider = "KEYCLOAK".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_port_fails() {
        let mut config = valid_config();
        config.app.port = 0;
        assert!(messages(&config).iter().any(|m| m.contains("app.port")));
    }

    #[test]
    fn bad_log_level_and_format_both_reported() {
        let mut config = valid_config();
        config.logging.level = "verbose".to_string();
        config.logging.format = "xml".to_string();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 2);
    }

    #[test]
    fn base_url_requires_scheme() {
        let mut config = valid_config();
        config.iam.keycloak.base_url = "sso.example.com".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("http://")));
    }

    #[test]
    fn cors_origin_must_be_wildcard_or_url() {
        let mut config = valid_config();
        config.security.cors.allowed_origins = vec!["*".into(), "example.com".into()];
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("example.com"));
    }
}
