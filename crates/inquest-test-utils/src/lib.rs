// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Inquest integration tests.
//!
//! # Components
//!
//! - [`ScriptedReasoner`] - deterministic reasoner stub with queued responses
//! - [`TempDataset`] - a dataset file in a temporary directory
//! - [`fixtures`] - sample papers, steps, and a test configuration

pub mod dataset;
pub mod fixtures;
pub mod scripted;

pub use dataset::TempDataset;
pub use scripted::{ReasonerCall, ScriptedReasoner};
