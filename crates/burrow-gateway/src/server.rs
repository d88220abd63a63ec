// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The public surface is one
//! unauthenticated health endpoint; everything under `/api` sits behind the
//! bearer-token auth middleware, including the SSE and WebSocket streaming
//! endpoints (which may authenticate via `?token=`, see [`crate::auth`]).

use std::sync::Arc;
use std::time::Instant;

use axum::{Router, middleware as axum_middleware, routing::get};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use burrow_core::{BurrowError, Principal, TokenValidator};

use crate::auth::{AuthState, auth_middleware};
use crate::handlers;
use crate::sse;
use crate::ws;

/// Events published on the gateway's broadcast bus and delivered to SSE
/// subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A streaming connection (SSE or WebSocket) was established.
    StreamOpened {
        connection_id: String,
        principal: String,
    },
    /// A streaming connection closed.
    StreamClosed { connection_id: String },
    /// Periodic liveness signal.
    Heartbeat { uptime_secs: u64 },
}

impl GatewayEvent {
    /// SSE event name for this variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StreamOpened { .. } => "stream_opened",
            Self::StreamClosed { .. } => "stream_closed",
            Self::Heartbeat { .. } => "heartbeat",
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Broadcast bus feeding the SSE event stream.
    pub events: broadcast::Sender<GatewayEvent>,
    /// Live streaming connections, keyed by connection id.
    pub connections: Arc<DashMap<String, Principal>>,
    /// Process start time for uptime reporting.
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            events,
            connections: Arc::new(DashMap::new()),
            started_at: Instant::now(),
        }
    }
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Gateway server configuration (mirrors `GatewayConfig` from burrow-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Separated from [`start_server`] so tests can drive the full middleware
/// chain without binding a socket.
pub fn router(state: GatewayState, validator: Arc<dyn TokenValidator>) -> Router {
    let auth_state = AuthState::new(validator);

    // Unauthenticated public route (health for load balancers and systemd).
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    // Everything under /api requires authentication. The streaming routes
    // live under the prefixes the extractor's query fallback recognizes.
    let api_routes = Router::new()
        .route("/api/session", get(handlers::get_session))
        .route("/api/sse/events", get(sse::events_handler))
        .route("/api/ws/echo", get(ws::ws_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port, spawns the heartbeat publisher, and
/// serves until ctrl-c.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    validator: Arc<dyn TokenValidator>,
) -> Result<(), BurrowError> {
    let heartbeat_state = state.clone();
    let heartbeat = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));
        loop {
            interval.tick().await;
            // Send fails when no subscriber is listening; that is fine.
            let _ = heartbeat_state.events.send(GatewayEvent::Heartbeat {
                uptime_secs: heartbeat_state.started_at.elapsed().as_secs(),
            });
        }
    });

    let app = router(state, validator);

    let addr = format!("{}:{}", config.host, config.port);
    let listener =
        tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| BurrowError::Gateway {
                message: format!("failed to bind gateway to {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;

    tracing::info!("Gateway server listening on {addr}");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BurrowError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        });

    heartbeat.abort();
    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
        // Fall through and keep serving; the process can still be killed.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
