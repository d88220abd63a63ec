// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read access to the authenticated principal for downstream handlers.
//!
//! The auth middleware stores exactly one [`Principal`] in request
//! extensions on success. Handlers read it back through [`principal`] or the
//! [`CurrentUser`] extractor; neither ever fails. An absent principal means
//! the request did not pass through the middleware, and the caller decides
//! whether to reject locally.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{Extensions, request::Parts},
};

use burrow_core::Principal;

/// Returns the principal stored by the auth middleware, if any.
pub fn principal(extensions: &Extensions) -> Option<&Principal> {
    extensions.get::<Principal>()
}

/// Extractor carrying the authenticated principal, if one is present.
///
/// Never rejects: on routes outside the auth middleware the inner option is
/// `None` and the handler chooses how to respond.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_principal_reads_as_none() {
        let extensions = Extensions::new();
        assert!(principal(&extensions).is_none());
    }

    #[test]
    fn stored_principal_reads_back() {
        let mut extensions = Extensions::new();
        extensions.insert(Principal::new("alice"));
        assert_eq!(principal(&extensions).map(Principal::as_str), Some("alice"));
    }

    #[tokio::test]
    async fn extractor_is_infallible_without_middleware() {
        let request = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn extractor_returns_stored_principal() {
        let request = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(Principal::new("bob"));
        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.as_ref().map(Principal::as_str), Some("bob"));
    }
}
