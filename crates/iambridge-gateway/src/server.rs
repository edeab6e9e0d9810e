// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, Request};
use axum::routing::{get, post};
use axum::{Router, middleware as axum_middleware};
use iambridge_config::model::CorsConfig;
use iambridge_core::{IamError, IamProvider};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::handlers;
use crate::middleware::{REQUEST_ID_HEADER, UuidRequestId, request_context};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The identity provider selected at startup.
    pub provider: Arc<dyn IamProvider>,
}

impl GatewayState {
    pub fn new(provider: Arc<dyn IamProvider>) -> Self {
        Self { provider }
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// Build the complete gateway router with its middleware stack.
///
/// Layers, outermost first: request-id assignment, request-id propagation,
/// HTTP tracing, CORS, then request context with panic recovery.
pub fn build_router(state: GatewayState, cors: &CorsConfig) -> Router {
    let api_routes = Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/refresh", post(handlers::refresh))
        .route("/auth/validate", get(handlers::validate))
        .route(
            "/users/{id}",
            get(handlers::get_user).put(handlers::update_user),
        )
        .route(
            "/users/{id}/roles",
            get(handlers::get_user_roles).post(handlers::assign_role),
        )
        .route(
            "/users/{id}/roles/{role}",
            axum::routing::delete(handlers::remove_role),
        );

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, UuidRequestId))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                info_span!(
                    "request",
                    method = %request.method(),
                    path = request.uri().path(),
                    request_id = request
                        .headers()
                        .get(&REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default(),
                )
            }),
        )
        .option_layer(cors_layer(cors))
        .layer(axum_middleware::from_fn(request_context));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(middleware)
        .with_state(state)
}

/// Build the CORS layer from configuration. No allowed origins means no
/// CORS headers at all.
pub fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if config.allowed_origins.is_empty() {
        return None;
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| HeaderName::from_bytes(h.trim().as_bytes()).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers(headers)
        .expose_headers([REQUEST_ID_HEADER])
        .max_age(Duration::from_secs(config.max_age_secs));

    if config.allowed_origins.iter().any(|o| o.trim() == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
        .collect();
    Some(
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true),
    )
}

/// Serve `router` on `listener` until `shutdown` resolves.
///
/// In-flight requests get `drain_timeout` to finish after the shutdown signal;
/// connections still open after that are dropped.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
    drain_timeout: Duration,
) -> Result<(), IamError> {
    let draining = Arc::new(Notify::new());
    let signal = {
        let draining = draining.clone();
        async move {
            shutdown.await;
            tracing::info!("shutdown signal received, draining connections");
            draining.notify_one();
        }
    };

    let server = axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .into_future();

    tokio::select! {
        result = server => result.map_err(|e| IamError::Transport {
            message: format!("gateway server error: {e}"),
            status: None,
            source: Some(Box::new(e)),
        }),
        _ = async {
            draining.notified().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!(
                timeout_secs = drain_timeout.as_secs(),
                "drain timeout elapsed, dropping remaining connections"
            );
            Ok(())
        }
    }
}
