// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so misspelled keys fail
//! at startup instead of silently falling back to defaults.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Process identity and HTTP listener settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Backend provider selection and connection settings.
    #[serde(default)]
    pub iam: IamConfig,

    /// CORS and related HTTP security settings.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Log level and output format.
    #[serde(default)]
    pub logging: LogConfig,
}

impl BridgeConfig {
    /// True when `app.debug` is set.
    pub fn is_debug(&self) -> bool {
        self.app.debug
    }
}

/// Application and listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Deployment environment (`development`, `staging`, `production`, ...).
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub debug: bool,

    /// Seconds to wait for in-flight requests on shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_environment(),
            host: default_host(),
            port: default_port(),
            debug: false,
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_app_name() -> String {
    "iambridge".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout_secs() -> u64 {
    15
}

/// Identity provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IamConfig {
    /// Name of the active provider, matched case-insensitively.
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub keycloak: KeycloakConfig,
}

impl IamConfig {
    /// The configured provider name, lower-cased.
    pub fn current_provider(&self) -> String {
        self.provider.trim().to_ascii_lowercase()
    }
}

impl Default for IamConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            keycloak: KeycloakConfig::default(),
        }
    }
}

fn default_provider() -> String {
    "keycloak".to_string()
}

/// Keycloak connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeycloakConfig {
    /// Server root, e.g. `https://sso.example.com`.
    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub realm: String,

    #[serde(default)]
    pub client_id: String,

    /// Never serialized; only deserialized from files or the environment.
    #[serde(default, skip_serializing)]
    pub client_secret: SecretString,

    /// Per-request timeout for every outbound call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Liveness check path relative to `base_url`. When unset, the realm's
    /// OpenID discovery document is fetched.
    #[serde(default)]
    pub health_path: Option<String>,
}

impl KeycloakConfig {
    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("base_url", self.base_url.as_str()),
            ("realm", self.realm.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            realm: String::new(),
            client_id: String::new(),
            client_secret: SecretString::default(),
            timeout_secs: default_timeout_secs(),
            health_path: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// HTTP security configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Cross-origin resource sharing policy.
///
/// An empty `allowed_origins` list disables CORS headers entirely.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,

    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,

    /// Preflight cache lifetime.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_allowed_headers() -> Vec<String> {
    ["Authorization", "Content-Type", "X-Request-ID"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_max_age_secs() -> u64 {
    86_400
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// trace, debug, info, warn, or error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}
