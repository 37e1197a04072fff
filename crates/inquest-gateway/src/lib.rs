// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Inquest: submit runs, poll their status, run
//! synchronously, and cancel.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use handlers::{CancelResponse, ErrorResponse, HealthResponse, SyncRunResponse};
pub use server::{GatewayState, ServerConfig, router, start_server};
