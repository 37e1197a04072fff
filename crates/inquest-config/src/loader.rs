// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./inquest.toml` > `~/.config/inquest/inquest.toml` > `/etc/inquest/inquest.toml`
//! with environment variable overrides via `INQUEST_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::InquestConfig;

/// Top-level sections, used to map `INQUEST_<SECTION>_<KEY>` onto `section.key`.
const SECTIONS: &[&str] = &[
    "agent",
    "reasoner",
    "retrieval",
    "memory",
    "orchestrator",
    "gateway",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/inquest/inquest.toml` (system-wide)
/// 3. `~/.config/inquest/inquest.toml` (user XDG config)
/// 4. `./inquest.toml` (local directory)
/// 5. `INQUEST_*` environment variables
pub fn load_config() -> Result<InquestConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<InquestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InquestConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<InquestConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InquestConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(InquestConfig::default()))
        .merge(Toml::file("/etc/inquest/inquest.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("inquest/inquest.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("inquest.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `INQUEST_REASONER_API_KEY`
/// must map to `reasoner.api_key`, not `reasoner.api.key`.
fn env_provider() -> Env {
    Env::prefixed("INQUEST_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn env_key_to_path(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
            .filter(|r| !r.is_empty())
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
