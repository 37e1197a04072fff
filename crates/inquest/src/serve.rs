// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inquest serve`: the HTTP gateway with graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use inquest_agent::{RunRegistry, build_orchestrator, drain_runs, install_signal_handler};
use inquest_config::InquestConfig;
use inquest_core::InquestError;
use inquest_corpus::CorpusCache;
use inquest_gateway::{AuthConfig, GatewayState, ServerConfig, start_server};
use tracing::info;

use crate::ServeArgs;

/// How long in-flight runs get to stop after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the run registry for the configured reasoner.
pub fn build_registry(config: InquestConfig) -> Result<(Arc<RunRegistry>, String), InquestError> {
    let config = Arc::new(config);
    let reasoner = inquest_reasoner::build_reasoner(&config.reasoner)?;
    let reasoner_name = reasoner.name().to_string();
    let orchestrator = build_orchestrator(reasoner, config);
    let registry = RunRegistry::new(Arc::new(orchestrator), Arc::new(CorpusCache::new()));
    Ok((Arc::new(registry), reasoner_name))
}

pub async fn run_serve(mut config: InquestConfig, args: ServeArgs) -> Result<(), InquestError> {
    if let Some(host) = args.host {
        config.gateway.host = host;
    }
    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    if let Some(data) = args.data {
        config.gateway.default_data_path = data;
    }

    info!(agent = %config.agent.name, "starting inquest serve");

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    let auth = AuthConfig {
        bearer_token: config.gateway.bearer_token.clone(),
    };
    let (registry, reasoner_name) = build_registry(config)?;
    let state = GatewayState::new(Arc::clone(&registry), &reasoner_name, auth);

    let shutdown = install_signal_handler();
    start_server(&server_config, state, shutdown).await?;

    let remaining = drain_runs(&registry, DRAIN_TIMEOUT).await;
    info!(remaining, "inquest serve stopped");
    Ok(())
}

/// Installs the global tracing subscriber. Logs go to stderr so `--json`
/// output on stdout stays parseable.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("inquest={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
