// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST surface.
//!
//! Handles GET /health (public) and GET /api/session (authenticated). The
//! tunnel instances themselves are managed by the control plane; this crate
//! only gatekeeps access to it.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::identity::CurrentUser;
use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

/// Response body for GET /api/session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The authenticated principal.
    pub principal: String,
    /// Number of live streaming connections across all principals.
    pub active_streams: usize,
}

/// GET /health
///
/// Returns gateway liveness. Not authenticated: load balancers and process
/// supervisors probe this before any token exists.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/session
///
/// Echoes the authenticated principal back to the caller along with the
/// current streaming connection count.
pub async fn get_session(
    State(state): State<GatewayState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let Some(principal) = user else {
        // Unreachable behind the auth middleware; reject locally if this
        // handler is ever mounted without it.
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "no authenticated principal".to_string(),
            }),
        )
            .into_response();
    };

    Json(SessionResponse {
        principal: principal.as_str().to_string(),
        active_streams: state.connections.len(),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"0.1.0\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[test]
    fn error_response_serializes_single_field() {
        let resp = ErrorResponse {
            error: "Missing authorization header".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"Missing authorization header"}"#);
    }

    #[test]
    fn session_response_serializes() {
        let resp = SessionResponse {
            principal: "alice".to_string(),
            active_streams: 3,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"principal\":\"alice\""));
        assert!(json.contains("\"active_streams\":3"));
    }
}
