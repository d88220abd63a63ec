// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for GET /api/ws/echo.
//!
//! The second streaming endpoint behind the query-token auth fallback.
//! Greets the authenticated principal, then echoes text frames back:
//!
//! Server -> Client (JSON):
//! ```json
//! {"type": "hello", "principal": "alice"}
//! {"type": "echo", "principal": "alice", "content": "..."}
//! ```

use axum::{
    Json,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};

use burrow_core::Principal;

use crate::handlers::ErrorResponse;
use crate::identity::CurrentUser;
use crate::server::{GatewayEvent, GatewayState};

/// WebSocket upgrade handler.
///
/// Authentication already happened in the middleware (header or `?token=`);
/// the upgrade only proceeds with a principal attached.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
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

    ws.on_upgrade(move |socket| handle_socket(socket, state, principal))
}

/// Handle an individual WebSocket connection until close.
async fn handle_socket(socket: WebSocket, state: GatewayState, principal: Principal) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = uuid::Uuid::new_v4().to_string();

    state
        .connections
        .insert(connection_id.clone(), principal.clone());
    let _ = state.events.send(GatewayEvent::StreamOpened {
        connection_id: connection_id.clone(),
        principal: principal.to_string(),
    });
    tracing::debug!(connection_id = %connection_id, principal = %principal, "WebSocket opened");

    if sender
        .send(Message::Text(hello_message(&principal).into()))
        .await
        .is_err()
    {
        close_connection(&state, &connection_id);
        return;
    }

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                let text_str: &str = &text;
                let reply = echo_message(&principal, text_str);
                if sender.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping (handled by tungstenite layer)
        }
    }

    close_connection(&state, &connection_id);
}

fn close_connection(state: &GatewayState, connection_id: &str) {
    state.connections.remove(connection_id);
    let _ = state.events.send(GatewayEvent::StreamClosed {
        connection_id: connection_id.to_string(),
    });
    tracing::debug!(connection_id = %connection_id, "WebSocket closed");
}

fn hello_message(principal: &Principal) -> String {
    serde_json::json!({
        "type": "hello",
        "principal": principal.as_str(),
    })
    .to_string()
}

fn echo_message(principal: &Principal, content: &str) -> String {
    serde_json::json!({
        "type": "echo",
        "principal": principal.as_str(),
        "content": content,
    })
    .to_string()
}
