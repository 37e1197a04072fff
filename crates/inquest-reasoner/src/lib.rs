// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External reasoner implementations for Inquest.
//!
//! [`ChatReasoner`] talks to an OpenAI-compatible chat-completions endpoint
//! and enforces the plan / reflection / synthesis contracts strictly.
//! [`HeuristicReasoner`] is a deterministic offline stand-in.

pub mod chat;
pub mod client;
pub mod heuristic;
pub mod parse;
pub mod prompt;
pub mod types;

use std::sync::Arc;

use inquest_config::model::{ReasonerConfig, ReasonerProvider};
use inquest_core::{InquestError, Reasoner};
use tracing::info;

pub use chat::ChatReasoner;
pub use client::ChatClient;
pub use heuristic::HeuristicReasoner;

/// Builds the reasoner selected by `config.provider`.
pub fn build_reasoner(config: &ReasonerConfig) -> Result<Arc<dyn Reasoner>, InquestError> {
    let reasoner: Arc<dyn Reasoner> = match config.provider {
        ReasonerProvider::OpenaiCompatible => Arc::new(ChatReasoner::from_config(config)?),
        ReasonerProvider::Heuristic => Arc::new(HeuristicReasoner::new()),
    };
    info!(
        provider = reasoner.name(),
        model = %config.model,
        "reasoner initialized"
    );
    Ok(reasoner)
}
