// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the server monitors. Active runs are
//! cancelled and drained before the process exits.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::registry::RunRegistry;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
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
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable, listening for Ctrl+C only");
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

/// Cancels every unfinished run and waits up to `timeout` for them to settle.
///
/// Returns the number of runs still active when the wait ended.
pub async fn drain_runs(registry: &RunRegistry, timeout: Duration) -> usize {
    let cancelled = registry.cancel_all();
    if cancelled == 0 {
        info!("no active runs to drain");
        return 0;
    }
    info!(count = cancelled, "waiting for active runs to stop");

    let deadline = Instant::now() + timeout;
    loop {
        let remaining = registry.active();
        if remaining == 0 {
            info!("all runs drained");
            return 0;
        }
        if Instant::now() >= deadline {
            warn!(remaining, "drain timeout reached, abandoning runs");
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
