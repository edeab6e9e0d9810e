// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the IAM bridge.
//!
//! One schema with a section per concern (`app`, `iam`, `security`,
//! `logging`), layered from compiled defaults, TOML files, and
//! `IAMBRIDGE_*` environment variables. Unknown keys are rejected and
//! rendered as miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use iambridge_config::load_and_validate;
//!
//! let config = load_and_validate(None).expect("config errors");
//! println!("listening on {}:{}", config.app.host, config.app.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BridgeConfig;

/// Load configuration and validate it.
///
/// With `explicit` set, only that file (plus env overrides) is read;
/// otherwise the standard file hierarchy is searched. Deserialization
/// failures are converted into diagnostics carrying source spans.
pub fn load_and_validate(explicit: Option<&Path>) -> Result<BridgeConfig, Vec<ConfigError>> {
    let loaded = match explicit {
        Some(path) => loader::load_config_from_path(path),
        None => loader::load_config(),
    };

    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = match explicit {
                Some(path) => read_sources(&[path.to_path_buf()]),
                None => read_sources(&loader::search_paths()),
            };
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<BridgeConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read the TOML files that exist among `paths`, for error span resolution.
fn read_sources(paths: &[std::path::PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .filter_map(|path| {
            std::fs::read_to_string(path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
