// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token validator backends.
//!
//! Two implementations of [`TokenValidator`] ship with the gateway:
//! [`StaticTokenValidator`] resolves tokens against an in-memory table
//! (single-box deployments, tests), and [`HttpTokenValidator`] delegates to
//! the control-plane's token introspection endpoint. The auth middleware
//! only ever sees the trait.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use burrow_core::{BurrowError, Principal, TokenValidator};

/// Token table entry: the principal plus an optional expiry instant.
#[derive(Debug, Clone)]
struct StaticEntry {
    principal: Principal,
    expires_at: Option<DateTime<Utc>>,
}

/// In-memory token -> principal table.
///
/// Lookup is a plain `HashMap` get: bearer tokens are high-entropy random
/// strings carried over TLS, where response-timing side channels are not a
/// practical concern.
#[derive(Debug, Default)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, StaticEntry>,
}

impl StaticTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a validator from a config-style token -> principal table.
    pub fn from_table(table: &HashMap<String, String>) -> Self {
        let mut validator = Self::new();
        for (token, principal) in table {
            validator.insert(token, principal.as_str());
        }
        validator
    }

    /// Register a non-expiring token.
    pub fn insert(&mut self, token: impl Into<String>, principal: impl Into<Principal>) {
        self.tokens.insert(
            token.into(),
            StaticEntry {
                principal: principal.into(),
                expires_at: None,
            },
        );
    }

    /// Register a token that stops validating at `expires_at`.
    pub fn insert_expiring(
        &mut self,
        token: impl Into<String>,
        principal: impl Into<Principal>,
        expires_at: DateTime<Utc>,
    ) {
        self.tokens.insert(
            token.into(),
            StaticEntry {
                principal: principal.into(),
                expires_at: Some(expires_at),
            },
        );
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<Principal, BurrowError> {
        match self.tokens.get(token) {
            Some(entry) => match entry.expires_at {
                Some(expires_at) if expires_at <= Utc::now() => {
                    Err(BurrowError::Auth("token expired".to_string()))
                }
                _ => Ok(entry.principal.clone()),
            },
            None => Err(BurrowError::Auth("unknown token".to_string())),
        }
    }
}

/// Introspection request body sent to the control plane.
#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// Introspection response body from the control plane.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    principal: String,
}

/// Validator that delegates to a control-plane token introspection endpoint.
///
/// POSTs `{"token": "..."}` to the configured URL and expects a 2xx with
/// `{"principal": "..."}`. Every other outcome (non-2xx, malformed body,
/// transport error, timeout) is a validation failure; transport problems
/// are logged at `warn` so operators can tell an outage from bad
/// credentials, but the client-facing contract stays "invalid or expired".
#[derive(Debug, Clone)]
pub struct HttpTokenValidator {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpTokenValidator {
    /// Create a validator for the given introspection endpoint.
    pub fn new(verify_url: String, timeout: Duration) -> Result<Self, BurrowError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BurrowError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, verify_url })
    }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    async fn validate(&self, token: &str) -> Result<Principal, BurrowError> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest { token })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %self.verify_url, error = %e, "token introspection request failed");
                BurrowError::Upstream {
                    message: "token introspection request failed".to_string(),
                    source: Some(Box::new(e)),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BurrowError::Auth(format!(
                "introspection endpoint rejected token (status {status})"
            )));
        }

        let body: VerifyResponse = response.json().await.map_err(|e| {
            tracing::warn!(url = %self.verify_url, error = %e, "malformed introspection response");
            BurrowError::Upstream {
                message: "malformed introspection response".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        if body.principal.is_empty() {
            return Err(BurrowError::Auth(
                "introspection returned an empty principal".to_string(),
            ));
        }
        Ok(Principal::new(body.principal))
    }
}
