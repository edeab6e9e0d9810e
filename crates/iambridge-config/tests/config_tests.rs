// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the IAM bridge configuration system.

use std::io::Write;
use std::path::Path;

use iambridge_config::diagnostic::ConfigError;
use iambridge_config::model::BridgeConfig;
use iambridge_config::{
    load_and_validate, load_and_validate_str, load_config_from_path, load_config_from_str,
};
use secrecy::ExposeSecret;

const COMPLETE: &str = r#"
[app]
name = "bridge-test"
environment = "production"
host = "0.0.0.0"
port = 9090
debug = true
shutdown_timeout_secs = 5

[iam]
provider = "Keycloak"

[iam.keycloak]
base_url = "https://sso.example.com"
realm = "main"
client_id = "bridge"
client_secret = "secret"
timeout_secs = 3
health_path = "/health/ready"

[security.cors]
allowed_origins = ["https://app.example.com"]
allowed_methods = ["GET", "POST"]
allowed_headers = ["Authorization"]
max_age_secs = 600

[logging]
level = "debug"
format = "json"
"#;

/// Valid TOML with every known field deserializes successfully.
#[test]
fn complete_toml_deserializes() {
    let config = load_and_validate_str(COMPLETE).expect("complete config should validate");

    assert_eq!(config.app.name, "bridge-test");
    assert_eq!(config.app.port, 9090);
    assert!(config.is_debug());
    assert!(!config.app.is_development());
    assert_eq!(config.app.shutdown_timeout_secs, 5);
    assert_eq!(config.iam.current_provider(), "keycloak");
    assert_eq!(config.iam.keycloak.realm, "main");
    assert_eq!(config.iam.keycloak.timeout_secs, 3);
    assert_eq!(config.iam.keycloak.health_path.as_deref(), Some("/health/ready"));
    assert_eq!(
        config.security.cors.allowed_origins,
        vec!["https://app.example.com"]
    );
    assert_eq!(config.security.cors.max_age_secs, 600);
    assert_eq!(config.logging.format, "json");
}

/// Missing sections fall back to defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.name, "iambridge");
    assert_eq!(config.app.host, "127.0.0.1");
    assert_eq!(config.app.port, 8080);
    assert_eq!(config.app.shutdown_timeout_secs, 15);
    assert_eq!(config.iam.provider, "keycloak");
    assert_eq!(config.iam.keycloak.timeout_secs, 10);
    assert!(config.iam.keycloak.health_path.is_none());
    assert!(config.security.cors.allowed_origins.is_empty());
    assert_eq!(config.security.cors.max_age_secs, 86_400);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
}

/// Defaults alone are incomplete: the provider needs connection settings.
#[test]
fn defaults_fail_validation_for_missing_provider_settings() {
    let errors = load_and_validate_str("").expect_err("defaults lack keycloak settings");
    assert_eq!(
        errors
            .iter()
            .filter(|e| matches!(e, ConfigError::Validation { .. }))
            .count(),
        4
    );
}

/// A typo in a nested table becomes an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_nested_key_suggests_correction() {
    let toml = r#"
[iam.keycloak]
relam = "main"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "relam");
            assert_eq!(suggestion.as_deref(), Some("realm"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Wrong value types are reported with the offending key path.
#[test]
fn wrong_type_reports_key_path() {
    let toml = r#"
[app]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("port must be an integer");
    assert!(errors.iter().any(|e| match e {
        ConfigError::InvalidType { key, .. } => key.ends_with("port"),
        _ => false,
    }));
}

/// Dotted overrides land on underscored field names.
#[test]
fn dotted_override_sets_client_secret() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: BridgeConfig = Figment::new()
        .merge(Serialized::defaults(BridgeConfig::default()))
        .merge(Toml::string(COMPLETE))
        .merge(("iam.keycloak.client_secret", "from-env"))
        .extract()
        .expect("override should merge");

    assert_eq!(config.iam.keycloak.client_secret.expose_secret(), "from-env");
    assert_eq!(config.iam.keycloak.client_id, "bridge");
}

/// Upper-case `IAMBRIDGE_*` variables land on nested, underscored fields.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("iambridge.toml", COMPLETE)?;
        jail.set_env("IAMBRIDGE_IAM_KEYCLOAK_CLIENT_SECRET", "from-env");
        jail.set_env("IAMBRIDGE_APP_PORT", "9191");
        jail.set_env("IAMBRIDGE_LOGGING_LEVEL", "warn");

        let config = load_config_from_path(Path::new("iambridge.toml"))?;
        assert_eq!(config.iam.keycloak.client_secret.expose_secret(), "from-env");
        assert_eq!(config.iam.keycloak.client_id, "bridge");
        assert_eq!(config.app.port, 9191);
        assert_eq!(config.logging.level, "warn");
        Ok(())
    });
}

/// The hierarchy loader applies the same env mapping as an explicit path.
#[test]
fn env_vars_validate_through_hierarchy() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("IAMBRIDGE_IAM_KEYCLOAK_BASE_URL", "https://sso.example.com");
        jail.set_env("IAMBRIDGE_IAM_KEYCLOAK_REALM", "main");
        jail.set_env("IAMBRIDGE_IAM_KEYCLOAK_CLIENT_ID", "bridge");
        jail.set_env("IAMBRIDGE_IAM_KEYCLOAK_CLIENT_SECRET", "from-env");

        let config = load_and_validate(None).map_err(|errors| {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        })?;
        assert_eq!(config.iam.keycloak.realm, "main");
        assert_eq!(config.iam.keycloak.client_secret.expose_secret(), "from-env");
        Ok(())
    });
}

/// An explicit config path is read instead of the hierarchy.
#[test]
fn explicit_path_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(COMPLETE.as_bytes()).expect("write config");

    let config = load_and_validate(Some(file.path())).expect("explicit file should validate");
    assert_eq!(config.app.name, "bridge-test");
}
