// SPDX-FileCopyrightText: 2026 Burrow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic error types for configuration loading and validation.
//!
//! Wraps figment parse failures and semantic validation failures in miette
//! diagnostics so startup errors render with codes and help text instead of
//! a bare Debug dump.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic rendering support.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A parse or merge error from the figment pipeline (bad TOML, wrong
    /// types, unknown keys).
    #[error("configuration error: {0}")]
    #[diagnostic(
        code(burrow::config::parse),
        help("check burrow.toml and any BURROW_* environment overrides")
    )]
    Parse(String),

    /// A semantic constraint violated by an otherwise well-formed config.
    #[error("validation error: {message}")]
    #[diagnostic(code(burrow::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Render a batch of configuration errors to stderr using miette's
/// graphical report handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
