// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rede.toml` > `~/.config/rede/rede.toml` > `/etc/rede/rede.toml`
//! with environment variable overrides via `REDE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RedeConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rede/rede.toml` (system-wide)
/// 3. `~/.config/rede/rede.toml` (user XDG config)
/// 4. `./rede.toml` (local directory)
/// 5. `REDE_*` environment variables
pub fn load_config() -> Result<RedeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<RedeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RedeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RedeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RedeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RedeConfig::default()))
        .merge(Toml::file("/etc/rede/rede.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rede/rede.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rede.toml"))
        .merge(env_provider())
}

/// Environment variable provider mapping the first `_` after a section name
/// to a dot.
///
/// `Env::split("_")` would break keys that contain underscores:
/// `REDE_SESSION_TTL_HOURS` must map to `session.ttl_hours`.
fn env_provider() -> Env {
    Env::prefixed("REDE_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ["agent", "session", "lateness", "roles"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
