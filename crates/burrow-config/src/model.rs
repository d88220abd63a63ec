// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Burrow gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup rather than silently ignoring them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Top-level Burrow configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; a default config starts a gateway that rejects every request
/// (no tokens configured, fail-closed).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BurrowConfig {
    /// HTTP gateway bind settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Token validation settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// HTTP gateway bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which token validation backend the gateway uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Validate against the in-memory `auth.tokens` table.
    #[default]
    Static,
    /// Delegate to the control-plane token introspection endpoint.
    Remote,
}

/// Token validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Validation backend selector.
    #[serde(default)]
    pub mode: AuthMode,

    /// Token -> principal table for `static` mode.
    #[serde(default)]
    pub tokens: HashMap<String, String>,

    /// Introspection endpoint URL for `remote` mode.
    #[serde(default)]
    pub verify_url: Option<String>,

    /// Timeout for introspection calls in `remote` mode.
    #[serde(default = "default_verify_timeout_secs")]
    pub verify_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            tokens: HashMap::new(),
            verify_url: None,
            verify_timeout_secs: default_verify_timeout_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8470
}

fn default_verify_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}
