// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./burrow.toml` > `~/.config/burrow/burrow.toml` >
//! `/etc/burrow/burrow.toml` with environment variable overrides via the
//! `BURROW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BurrowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/burrow/burrow.toml` (system-wide)
/// 3. `~/.config/burrow/burrow.toml` (user XDG config)
/// 4. `./burrow.toml` (local directory)
/// 5. `BURROW_*` environment variables
pub fn load_config() -> Result<BurrowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BurrowConfig::default()))
        .merge(Toml::file("/etc/burrow/burrow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("burrow/burrow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("burrow.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BurrowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BurrowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BurrowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BurrowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that key names
/// containing underscores stay intact: `BURROW_AUTH_VERIFY_URL` must map to
/// `auth.verify_url`, not `auth.verify.url`.
fn env_provider() -> Env {
    Env::prefixed("BURROW_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: BURROW_GATEWAY_PORT -> "gateway_port"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("gateway_", "gateway.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
