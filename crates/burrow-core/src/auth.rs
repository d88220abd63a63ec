// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token validation trait implemented by credential backends.

use async_trait::async_trait;

use crate::error::BurrowError;
use crate::types::Principal;

/// Validates opaque bearer tokens and resolves them to principals.
///
/// Implementations must be safe for concurrent calls; the gateway invokes
/// the validator from many in-flight requests at once. The auth middleware
/// treats every failure identically as "invalid or expired" regardless of
/// the underlying cause, so implementations are free to use error variants
/// that aid logging without changing the client-facing contract.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate `token` and return the principal it was issued to.
    async fn validate(&self, token: &str) -> Result<Principal, BurrowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysAlice;

    #[async_trait]
    impl TokenValidator for AlwaysAlice {
        async fn validate(&self, _token: &str) -> Result<Principal, BurrowError> {
            Ok(Principal::new("alice"))
        }
    }

    #[tokio::test]
    async fn trait_is_object_safe() {
        let validator: Box<dyn TokenValidator> = Box::new(AlwaysAlice);
        let principal = validator.validate("anything").await.unwrap();
        assert_eq!(principal.as_str(), "alice");
    }
}
