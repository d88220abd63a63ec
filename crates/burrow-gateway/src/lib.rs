// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/SSE/WebSocket gateway for the Burrow tunnel service.
//!
//! The gateway is the single choke point in front of the tunnel control
//! plane: every API and streaming request is authenticated by the bearer-
//! token middleware in [`auth`] before any business handler runs. Validated
//! identities travel in request extensions and are read back through
//! [`identity`]. Token resolution is pluggable via the
//! [`burrow_core::TokenValidator`] trait, with the backends in
//! [`validator`].

pub mod auth;
pub mod handlers;
pub mod identity;
pub mod server;
pub mod sse;
pub mod validator;
pub mod ws;

pub use auth::{AuthError, AuthState, auth_middleware, extract_token};
pub use identity::CurrentUser;
pub use server::{GatewayState, ServerConfig, router, start_server};
pub use validator::{HttpTokenValidator, StaticTokenValidator};
