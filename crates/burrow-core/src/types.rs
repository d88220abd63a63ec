// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Burrow workspace.

use serde::{Deserialize, Serialize};

/// The authenticated identity associated with a validated bearer token.
///
/// The auth middleware attaches a `Principal` to request extensions for the
/// lifetime of a single request. It is never persisted by the gateway and is
/// discarded when the response is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from an identity string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identity string (e.g., a username).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this principal carries no identity.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Principal {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_round_trips_through_serde() {
        let principal = Principal::new("alice");
        let json = serde_json::to_string(&principal).unwrap();
        assert_eq!(json, "\"alice\"");
        let back: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, principal);
    }

    #[test]
    fn principal_display_is_the_identity_string() {
        let principal = Principal::from("bob");
        assert_eq!(principal.to_string(), "bob");
        assert_eq!(principal.as_str(), "bob");
        assert!(!principal.is_empty());
    }

    #[test]
    fn empty_principal_reports_empty() {
        assert!(Principal::new("").is_empty());
    }
}
