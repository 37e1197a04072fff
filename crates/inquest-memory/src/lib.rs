// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-run context memory for the Inquest orchestrator.
//!
//! [`ContextMemory`] accumulates step summaries and reflections, keeps an
//! exact citation index, and renders a bounded [`inquest_core::MemorySnapshot`]
//! for the reasoner.

pub mod context;

pub use context::{ContextMemory, MemoryEntry};
