// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events stream for GET /api/sse/events.
//!
//! Subscribes the caller to the gateway's broadcast bus and forwards each
//! event as a named SSE event with a JSON payload. This is one of the two
//! streaming endpoints the query-token auth fallback exists for: browser
//! `EventSource` cannot set an `Authorization` header.

use std::convert::Infallible;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream;
use tokio::sync::broadcast;

use crate::handlers::ErrorResponse;
use crate::identity::CurrentUser;
use crate::server::{GatewayEvent, GatewayState};

/// Removes the connection from the registry and announces the close when
/// the SSE stream is dropped (client disconnect or server shutdown).
struct StreamGuard {
    connection_id: String,
    state: GatewayState,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.state.connections.remove(&self.connection_id);
        let _ = self.state.events.send(GatewayEvent::StreamClosed {
            connection_id: self.connection_id.clone(),
        });
        tracing::debug!(connection_id = %self.connection_id, "SSE stream closed");
    }
}

/// GET /api/sse/events
///
/// Streams gateway events to the authenticated caller until disconnect.
pub async fn events_handler(
    State(state): State<GatewayState>,
    CurrentUser(user): CurrentUser,
) -> Response {
    let Some(principal) = user else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "no authenticated principal".to_string(),
            }),
        )
            .into_response();
    };

    let connection_id = uuid::Uuid::new_v4().to_string();
    // Subscribe before announcing so this stream sees its own open event.
    let rx = state.events.subscribe();
    state
        .connections
        .insert(connection_id.clone(), principal.clone());
    let _ = state.events.send(GatewayEvent::StreamOpened {
        connection_id: connection_id.clone(),
        principal: principal.to_string(),
    });
    tracing::debug!(connection_id = %connection_id, principal = %principal, "SSE stream opened");

    let guard = StreamGuard {
        connection_id,
        state,
    };

    let stream = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.name()).json_data(&event) {
                    Ok(sse_event) => return Some((Ok::<_, Infallible>(sse_event), (rx, guard))),
                    Err(e) => {
                        tracing::warn!("failed to encode gateway event: {e}");
                        continue;
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "SSE subscriber lagged, dropping missed events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}
