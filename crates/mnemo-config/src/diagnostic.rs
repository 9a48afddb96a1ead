// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error diagnostics rendered via miette.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error surfaced at load or validation time.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration failed to parse or deserialize.
    #[error("failed to load configuration: {message}")]
    #[diagnostic(
        code(mnemo::config::parse),
        help("check mnemo.toml against the documented [engine] and [ollama] keys")
    )]
    Parse {
        /// Figment's description of the failure.
        message: String,
    },

    /// A value deserialized fine but violates a semantic constraint.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(mnemo::config::validation))]
    Validation {
        /// What constraint was violated.
        message: String,
    },
}

/// Render a list of configuration errors to stderr via miette's fancy reporter.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::msg(error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_problem() {
        let parse = ConfigError::Parse {
            message: "unknown field `max_wrokers`".into(),
        };
        assert!(parse.to_string().contains("max_wrokers"));

        let validation = ConfigError::Validation {
            message: "engine.max_workers must be at least 1".into(),
        };
        assert!(validation.to_string().contains("max_workers"));
    }
}
