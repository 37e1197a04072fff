// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented outside the core crate.

pub mod reasoner;

pub use reasoner::{PlanRequest, Reasoner, ReflectRequest, SummarizeRequest};
