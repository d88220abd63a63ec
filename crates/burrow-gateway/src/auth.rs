// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Every protected request passes through [`auth_middleware`] before any
//! business handler runs. Credentials arrive one of two ways, tried in
//! fixed priority order:
//!
//! 1. `Authorization: Bearer <token>` header
//! 2. `?token=<value>` query parameter, accepted only for GET requests to
//!    the streaming prefixes (`/api/ws/`, `/api/sse/`), because browser
//!    EventSource and WebSocket clients cannot set custom headers
//!
//! A present-but-malformed header short-circuits the attempt; it never
//! falls through to the query parameter. On success the resolved
//! [`Principal`] is inserted into request extensions for downstream
//! handlers (see [`crate::identity`]).

use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use burrow_core::TokenValidator;

use crate::handlers::ErrorResponse;

/// Path prefixes whose GET endpoints may authenticate via `?token=`.
const STREAMING_PREFIXES: [&str; 2] = ["/api/ws/", "/api/sse/"];

/// Shared state for the auth middleware: the token validation backend.
#[derive(Clone)]
pub struct AuthState {
    validator: Arc<dyn TokenValidator>,
}

impl AuthState {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState").finish_non_exhaustive()
    }
}

/// Terminal authentication failures. Each maps to a 401 with a fixed
/// single-field JSON body; the three kinds are deliberately distinct so
/// clients can tell "I sent garbage" from "I sent nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// An `Authorization` header was present but not `Bearer <token>`.
    MalformedHeader,
    /// No accepted delivery mode produced a non-empty token.
    MissingCredential,
    /// The validator rejected the token.
    InvalidToken,
}

impl AuthError {
    /// The client-facing error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MalformedHeader => {
                "Invalid authorization header format. Expected: Bearer <token>"
            }
            Self::MissingCredential => "Missing authorization header",
            Self::InvalidToken => "Invalid or expired token",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: self.message().to_string(),
            }),
        )
            .into_response()
    }
}

/// Middleware that authenticates a request before forwarding it.
///
/// State machine, terminal on first failure:
/// 1. Extract a candidate token (header, then query fallback).
/// 2. Validate it against the configured [`TokenValidator`].
/// 3. On success, attach the principal to request extensions and forward.
///
/// Holds no state across requests; safe to invoke concurrently as long as
/// the validator is (a stated precondition of [`TokenValidator`]).
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers(), request.method(), request.uri()) {
        Ok(token) => token,
        Err(err) => {
            tracing::debug!(path = %request.uri().path(), ?err, "rejecting unauthenticated request");
            return err.into_response();
        }
    };

    match auth.validator.validate(&token).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => {
            // All validator failures collapse to one client-facing 401;
            // the log line keeps the real cause for operators.
            tracing::debug!(path = %request.uri().path(), %err, "token rejected");
            AuthError::InvalidToken.into_response()
        }
    }
}

/// Produce a single candidate token from the request, or the failure that
/// terminates the attempt.
///
/// The `Authorization` header, when present and non-empty, is authoritative:
/// it either parses as exactly `Bearer <token>` or the whole attempt fails
/// as malformed. The query fallback applies only when the header is absent
/// entirely.
pub fn extract_token(headers: &HeaderMap, method: &Method, uri: &Uri) -> Result<String, AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let Ok(value) = value.to_str() else {
            // Non-UTF-8 bytes cannot possibly be `Bearer <token>`.
            return Err(AuthError::MalformedHeader);
        };
        if value.trim().is_empty() {
            // Present but empty: no usable credential, and the fallback
            // requires the header to be absent entirely.
            return Err(AuthError::MissingCredential);
        }
        return parse_bearer(value);
    }

    if method == Method::GET && is_streaming_path(uri.path()) {
        if let Some(token) = query_token(uri.query().unwrap_or("")) {
            return Ok(token);
        }
    }

    Err(AuthError::MissingCredential)
}

/// Split a header value into exactly `Bearer` + token on whitespace runs.
///
/// Leading/trailing whitespace is tolerated; a missing token, a different
/// scheme keyword, or extra parts are all malformed.
fn parse_bearer(value: &str) -> Result<String, AuthError> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token.to_string()),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Literal, case-sensitive prefix match against the streaming endpoints.
fn is_streaming_path(path: &str) -> bool {
    STREAMING_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Find a non-empty `token` query parameter.
fn query_token(query: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        pair.strip_prefix("token=")
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_parses() {
        assert_eq!(parse_bearer("Bearer abc123").unwrap(), "abc123");
    }

    #[test]
    fn bearer_header_with_surrounding_whitespace_parses() {
        assert_eq!(parse_bearer("  Bearer   abc123  ").unwrap(), "abc123");
    }

    #[test]
    fn missing_token_part_is_malformed() {
        assert_eq!(parse_bearer("Bearer").unwrap_err(), AuthError::MalformedHeader);
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        assert_eq!(parse_bearer("Basic abc123").unwrap_err(), AuthError::MalformedHeader);
        // The scheme keyword is matched literally.
        assert_eq!(parse_bearer("bearer abc123").unwrap_err(), AuthError::MalformedHeader);
    }

    #[test]
    fn extra_parts_are_malformed() {
        assert_eq!(
            parse_bearer("Bearer abc 123").unwrap_err(),
            AuthError::MalformedHeader
        );
    }

    #[test]
    fn streaming_prefixes_match_literally() {
        assert!(is_streaming_path("/api/ws/echo"));
        assert!(is_streaming_path("/api/sse/events"));
        assert!(!is_streaming_path("/api/wsx"));
        assert!(!is_streaming_path("/api/tunnels"));
        assert!(!is_streaming_path("/API/SSE/events"));
    }

    #[test]
    fn query_token_requires_exact_name_and_value() {
        assert_eq!(query_token("token=xyz"), Some("xyz".to_string()));
        assert_eq!(query_token("a=1&token=xyz&b=2"), Some("xyz".to_string()));
        assert_eq!(query_token("token="), None);
        assert_eq!(query_token("xtoken=xyz"), None);
        assert_eq!(query_token(""), None);
    }

    #[test]
    fn extract_prefers_header_over_query() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer from-header".parse().unwrap());
        let uri: Uri = "/api/sse/events?token=from-query".parse().unwrap();
        let token = extract_token(&headers, &Method::GET, &uri).unwrap();
        assert_eq!(token, "from-header");
    }

    #[test]
    fn malformed_header_never_falls_through_to_query() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "garbage".parse().unwrap());
        let uri: Uri = "/api/sse/events?token=valid".parse().unwrap();
        assert_eq!(
            extract_token(&headers, &Method::GET, &uri).unwrap_err(),
            AuthError::MalformedHeader
        );
    }

    #[test]
    fn empty_header_is_missing_not_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "".parse().unwrap());
        let uri: Uri = "/api/sse/events?token=valid".parse().unwrap();
        assert_eq!(
            extract_token(&headers, &Method::GET, &uri).unwrap_err(),
            AuthError::MissingCredential
        );
    }

    #[test]
    fn query_fallback_requires_get() {
        let headers = HeaderMap::new();
        let uri: Uri = "/api/sse/events?token=xyz".parse().unwrap();
        assert_eq!(
            extract_token(&headers, &Method::POST, &uri).unwrap_err(),
            AuthError::MissingCredential
        );
        assert_eq!(extract_token(&headers, &Method::GET, &uri).unwrap(), "xyz");
    }

    #[test]
    fn query_fallback_requires_streaming_prefix() {
        let headers = HeaderMap::new();
        let uri: Uri = "/api/other?token=xyz".parse().unwrap();
        assert_eq!(
            extract_token(&headers, &Method::GET, &uri).unwrap_err(),
            AuthError::MissingCredential
        );
    }

    // === Router-level middleware tests ===

    use std::sync::Arc;

    use axum::{Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    use crate::identity::CurrentUser;
    use crate::validator::StaticTokenValidator;

    async fn whoami(CurrentUser(user): CurrentUser) -> String {
        user.map(|p| p.as_str().to_string()).unwrap_or_default()
    }

    fn test_app() -> Router {
        let mut validator = StaticTokenValidator::new();
        validator.insert("abc123", "alice");
        validator.insert("xyz", "bob");
        let auth_state = AuthState::new(Arc::new(validator));
        Router::new()
            .route("/api/tunnels", get(whoami))
            .route("/api/other", get(whoami))
            .route("/api/sse/events", get(whoami))
            .route("/api/ws/echo", get(whoami))
            .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn header_happy_path_forwards_with_identity() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/tunnels")
                    .header("Authorization", "Bearer abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "alice");
    }

    #[tokio::test]
    async fn header_without_scheme_is_rejected_as_malformed() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/tunnels")
                    .header("Authorization", "abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        insta::assert_snapshot!(
            body_string(response).await,
            @r#"{"error":"Invalid authorization header format. Expected: Bearer <token>"}"#
        );
    }

    #[tokio::test]
    async fn wrong_scheme_is_rejected_as_malformed() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/tunnels")
                    .header("Authorization", "Basic abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("Invalid authorization header format"));
    }

    #[tokio::test]
    async fn no_credentials_at_all_is_rejected_as_missing() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/tunnels")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        insta::assert_snapshot!(
            body_string(response).await,
            @r#"{"error":"Missing authorization header"}"#
        );
    }

    #[tokio::test]
    async fn streaming_query_fallback_authenticates() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/sse/events?token=xyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "bob");
    }

    #[tokio::test]
    async fn query_token_outside_streaming_prefixes_is_missing() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/other?token=xyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("Missing authorization header"));
    }

    #[tokio::test]
    async fn query_token_with_post_is_missing() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/sse/events?token=xyz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("Missing authorization header"));
    }

    #[tokio::test]
    async fn unknown_token_is_rejected_as_invalid() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/tunnels")
                    .header("Authorization", "Bearer bad-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        insta::assert_snapshot!(
            body_string(response).await,
            @r#"{"error":"Invalid or expired token"}"#
        );
    }

    #[tokio::test]
    async fn header_wins_over_query_on_streaming_path() {
        // `abc123` resolves to alice; the query token that would resolve to
        // bob must never be consulted.
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/sse/events?token=xyz")
                    .header("Authorization", "Bearer abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "alice");
    }

    #[tokio::test]
    async fn concurrent_requests_keep_identities_separate() {
        let app = test_app();
        let alice_req = Request::builder()
            .uri("/api/tunnels")
            .header("Authorization", "Bearer abc123")
            .body(Body::empty())
            .unwrap();
        let bob_req = Request::builder()
            .uri("/api/tunnels")
            .header("Authorization", "Bearer xyz")
            .body(Body::empty())
            .unwrap();

        let (alice_resp, bob_resp) =
            tokio::join!(app.clone().oneshot(alice_req), app.clone().oneshot(bob_req));

        assert_eq!(body_string(alice_resp.unwrap()).await, "alice");
        assert_eq!(body_string(bob_resp.unwrap()).await, "bob");
    }
}
