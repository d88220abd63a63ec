// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Burrow control-plane gateway.
//!
//! This crate provides the shared error type, the `Principal` identity
//! newtype, and the `TokenValidator` trait that credential backends
//! implement. The gateway crate depends only on these contracts, never on
//! a concrete token store.

pub mod auth;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use auth::TokenValidator;
pub use error::BurrowError;
pub use types::Principal;
