// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `burrow serve` command implementation.
//!
//! Wires the configured token validation backend into the gateway server
//! and runs it until shutdown.

use std::sync::Arc;
use std::time::Duration;

use burrow_config::{AuthMode, BurrowConfig};
use burrow_core::{BurrowError, TokenValidator};
use burrow_gateway::{GatewayState, HttpTokenValidator, ServerConfig, StaticTokenValidator};
use tracing::info;

/// Start the gateway with the given configuration.
pub async fn run(config: BurrowConfig) -> Result<(), BurrowError> {
    init_tracing(&config.log.level);

    let validator = build_validator(&config)?;
    let state = GatewayState::new();
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    info!(
        mode = ?config.auth.mode,
        "starting gateway on {}:{}",
        server_config.host,
        server_config.port
    );

    burrow_gateway::start_server(&server_config, state, validator).await
}

/// Construct the token validation backend selected by the config.
fn build_validator(config: &BurrowConfig) -> Result<Arc<dyn TokenValidator>, BurrowError> {
    match config.auth.mode {
        AuthMode::Static => Ok(Arc::new(StaticTokenValidator::from_table(
            &config.auth.tokens,
        ))),
        AuthMode::Remote => {
            let url = config.auth.verify_url.clone().ok_or_else(|| {
                BurrowError::Config("auth.verify_url is required for remote mode".to_string())
            })?;
            let validator = HttpTokenValidator::new(
                url,
                Duration::from_secs(config.auth.verify_timeout_secs),
            )?;
            Ok(Arc::new(validator))
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("burrow={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
