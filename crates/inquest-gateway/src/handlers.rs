// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the runs API.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use inquest_agent::RunHandle;
use inquest_core::{InquestError, RunRequest, RunResult, RunStatus};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error kind, e.g. `run_not_found`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub reasoner: String,
    pub default_data_path: String,
    pub active_runs: usize,
}

/// Response body for POST /v1/runs/sync.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncRunResponse {
    pub run_id: String,
    pub status: RunStatus,
    pub result: RunResult,
}

/// Response body for POST /v1/runs/{run_id}/cancel.
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResponse {
    pub run_id: String,
    /// Status at the time of the request. Terminal runs are unaffected.
    pub status: RunStatus,
    pub cancel_requested: bool,
}

/// Maps an error to an HTTP status code.
pub fn status_for(err: &InquestError) -> StatusCode {
    match err {
        InquestError::InvalidRequest(_) | InquestError::Dataset { .. } => StatusCode::BAD_REQUEST,
        InquestError::RunNotFound { .. } => StatusCode::NOT_FOUND,
        InquestError::Cancelled { .. } => StatusCode::CONFLICT,
        InquestError::ReasonerContract { .. } | InquestError::ReasonerUnavailable { .. } => {
            StatusCode::BAD_GATEWAY
        }
        InquestError::UnknownTool { .. }
        | InquestError::ToolFailed { .. }
        | InquestError::ReplanBudgetExceeded { .. }
        | InquestError::Config(_)
        | InquestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts an error into a JSON error response.
pub fn error_response(err: &InquestError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!(kind = err.kind(), error = %err, "request failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.kind().to_string(),
            message: err.to_string(),
        }),
    )
        .into_response()
}

fn parse_body(body: Result<Json<RunRequest>, JsonRejection>) -> Result<RunRequest, Response> {
    body.map(|Json(request)| request).map_err(|rejection| {
        error_response(&InquestError::InvalidRequest(rejection.body_text()))
    })
}

/// POST /v1/runs
///
/// Queues a run and returns its id immediately with 202.
pub async fn submit_run(
    State(state): State<GatewayState>,
    body: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    let request = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match state.registry.submit(request) {
        Ok(handle) => (StatusCode::ACCEPTED, Json::<RunHandle>(handle)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /v1/runs/sync
///
/// Runs to completion and returns the result, or the run's error.
pub async fn run_sync(
    State(state): State<GatewayState>,
    body: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    let request = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    match state.registry.run_sync(request).await {
        Ok((run_id, result)) => Json(SyncRunResponse {
            run_id,
            status: RunStatus::Completed,
            result,
        })
        .into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /v1/runs/{run_id}
pub async fn get_run(State(state): State<GatewayState>, Path(run_id): Path<String>) -> Response {
    match state.registry.get(&run_id) {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /v1/runs/{run_id}/cancel
pub async fn cancel_run(State(state): State<GatewayState>, Path(run_id): Path<String>) -> Response {
    match state.registry.cancel(&run_id) {
        Ok(status) => (
            StatusCode::ACCEPTED,
            Json(CancelResponse {
                run_id,
                status,
                cancel_requested: !status.is_terminal(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /health
///
/// Unauthenticated liveness endpoint.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        reasoner: state.reasoner_name.to_string(),
        default_data_path: state.registry.default_data_path().to_string(),
        active_runs: state.registry.active(),
    })
}
