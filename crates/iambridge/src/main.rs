// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IAM Bridge - an HTTP gateway in front of identity providers.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod factory;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use iambridge_config::BridgeConfig;

/// IAM Bridge - an HTTP gateway in front of identity providers.
#[derive(Parser, Debug)]
#[command(name = "iambridge", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the gateway server (default).
    Serve,
    /// Validate the configuration and print a redacted summary.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match iambridge_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            iambridge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::CheckConfig => print_summary(&config),
    }
}

fn print_summary(config: &BridgeConfig) {
    println!("configuration OK");
    println!("  app:       {} ({})", config.app.name, config.app.environment);
    println!("  listen:    {}:{}", config.app.host, config.app.port);
    println!("  provider:  {}", config.iam.current_provider());
    println!("  keycloak:  {:?}", config.iam.keycloak);
    println!(
        "  cors:      {}",
        if config.security.cors.allowed_origins.is_empty() {
            "disabled".to_string()
        } else {
            config.security.cors.allowed_origins.join(", ")
        }
    );
    println!("  logging:   {} ({})", config.logging.level, config.logging.format);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["iambridge"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_flag_works_after_subcommand() {
        let cli = Cli::try_parse_from(["iambridge", "check-config", "--config", "/tmp/x.toml"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/x.toml")));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iambridge.toml");
        std::fs::write(
            &path,
            r#"
[app]
port = 9090

[iam.keycloak]
base_url = "https://sso.example.com"
realm = "main"
client_id = "bridge"
client_secret = "s3cret"
"#,
        )
        .unwrap();

        let config = iambridge_config::load_and_validate(Some(path.as_path())).unwrap();
        assert_eq!(config.app.port, 9090);
        assert_eq!(config.iam.current_provider(), "keycloak");
    }
}
