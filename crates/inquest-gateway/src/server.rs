// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use inquest_agent::RunRegistry;
use inquest_core::InquestError;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub registry: Arc<RunRegistry>,
    /// Name of the configured reasoner, reported by `/health`.
    pub reasoner_name: Arc<str>,
    pub auth: AuthConfig,
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl GatewayState {
    pub fn new(registry: Arc<RunRegistry>, reasoner_name: &str, auth: AuthConfig) -> Self {
        Self {
            registry,
            reasoner_name: Arc::from(reasoner_name),
            auth,
            start_time: std::time::Instant::now(),
        }
    }
}

/// Gateway server configuration (mirrors `GatewayConfig` from inquest-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the gateway router:
/// - GET /health (no auth)
/// - POST /v1/runs, POST /v1/runs/sync
/// - GET /v1/runs/{run_id}, POST /v1/runs/{run_id}/cancel
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/runs", post(handlers::submit_run))
        .route("/v1/runs/sync", post(handlers::run_sync))
        .route("/v1/runs/{run_id}", get(handlers::get_run))
        .route("/v1/runs/{run_id}/cancel", post(handlers::cancel_run))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds `host:port` and serves until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), InquestError> {
    if state.auth.bearer_token.is_none() && !is_loopback(&config.host) {
        tracing::warn!(host = %config.host, "gateway is listening without a bearer token");
    }
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| InquestError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| InquestError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopped");
    Ok(())
}

fn is_loopback(host: &str) -> bool {
    matches!(host, "127.0.0.1" | "localhost" | "::1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_hosts() {
        assert!(is_loopback("127.0.0.1"));
        assert!(is_loopback("localhost"));
        assert!(!is_loopback("0.0.0.0"));
    }

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8787,
        };
        assert!(format!("{config:?}").contains("8787"));
    }
}
