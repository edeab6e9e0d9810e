// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `iambridge serve` implementation.
//!
//! Builds the provider, wires the gateway router, and serves until SIGINT
//! or SIGTERM, then drains in-flight requests.

use std::time::Duration;

use iambridge_config::BridgeConfig;
use iambridge_core::IamError;
use iambridge_gateway::{GatewayState, build_router};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::factory::build_provider;

/// Run the gateway until a shutdown signal arrives.
pub async fn run_serve(config: BridgeConfig) -> Result<(), IamError> {
    init_tracing(&config.logging.level, &config.logging.format);

    let provider = build_provider(&config.iam)?;
    info!(
        provider = provider.name(),
        environment = %config.app.environment,
        "identity provider ready"
    );

    let router = build_router(GatewayState::new(provider), &config.security.cors);

    let addr = format!("{}:{}", config.app.host, config.app.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| IamError::Transport {
            message: format!("failed to bind gateway to {addr}: {e}"),
            status: None,
            source: Some(Box::new(e)),
        })?;
    info!("gateway listening on {addr}");

    let shutdown = install_signal_handler();
    iambridge_gateway::serve(
        listener,
        router,
        shutdown.cancelled_owned(),
        Duration::from_secs(config.app.shutdown_timeout_secs),
    )
    .await?;

    info!("gateway stopped");
    Ok(())
}

/// Installs handlers for SIGTERM and SIGINT.
///
/// The returned token is cancelled when either signal is received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                        _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to install SIGTERM handler");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Default filter when `RUST_LOG` is unset.
fn default_filter(level: &str) -> String {
    format!("iambridge={level},tower_http={level},warn")
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. `format = "json"` switches to
/// one JSON object per line.
fn init_tracing(level: &str, format: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false);

    if format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_bridge_crates() {
        assert_eq!(
            default_filter("debug"),
            "iambridge=debug,tower_http=debug,warn"
        );
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown() {
        let config = iambridge_test_utils::test_config("https://sso.example.com");
        let provider = build_provider(&config.iam).unwrap();
        let router = build_router(GatewayState::new(provider), &config.security.cors);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

        let token = CancellationToken::new();
        let handle = tokio::spawn(iambridge_gateway::serve(
            listener,
            router,
            token.clone().cancelled_owned(),
            Duration::from_secs(1),
        ));
        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
