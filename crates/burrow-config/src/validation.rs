// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as cross-field requirements between the auth mode and
//! its backend settings.

use crate::diagnostic::ConfigError;
use crate::model::{AuthMode, BurrowConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BurrowConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    match config.auth.mode {
        AuthMode::Static => {
            if config.auth.tokens.is_empty() {
                errors.push(ConfigError::Validation {
                    message: "auth.tokens must contain at least one entry when auth.mode is `static`"
                        .to_string(),
                });
            }
            for (token, principal) in &config.auth.tokens {
                if token.trim().is_empty() {
                    errors.push(ConfigError::Validation {
                        message: "auth.tokens contains an empty token".to_string(),
                    });
                }
                if principal.trim().is_empty() {
                    errors.push(ConfigError::Validation {
                        message: format!(
                            "auth.tokens entry for token ending `...{}` has an empty principal",
                            tail(token)
                        ),
                    });
                }
            }
        }
        AuthMode::Remote => {
            match config.auth.verify_url.as_deref().map(str::trim) {
                None | Some("") => errors.push(ConfigError::Validation {
                    message: "auth.verify_url is required when auth.mode is `remote`".to_string(),
                }),
                Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                    errors.push(ConfigError::Validation {
                        message: format!("auth.verify_url `{url}` must be an http(s) URL"),
                    });
                }
                Some(_) => {}
            }
            if config.auth.verify_timeout_secs == 0 {
                errors.push(ConfigError::Validation {
                    message: "auth.verify_timeout_secs must be at least 1".to_string(),
                });
            }
        }
    }

    let level = config.log.level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{level}` is not one of trace, debug, info, warn, error"
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Last few characters of a token, for error messages that must not echo
/// the full credential.
fn tail(token: &str) -> &str {
    let len = token.chars().count();
    let skip = len.saturating_sub(4);
    let mut chars = token.char_indices().skip(skip);
    match chars.next() {
        Some((idx, _)) => &token[idx..],
        None => token,
    }
}
