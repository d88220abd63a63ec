// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Burrow control-plane gateway.

use thiserror::Error;

/// The primary error type used across all Burrow crates.
#[derive(Debug, Error)]
pub enum BurrowError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Token validation failures (unknown, expired, or revoked credentials).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Gateway server errors (bind failure, serve loop termination).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upstream control-plane errors (introspection endpoint unreachable or misbehaving).
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
