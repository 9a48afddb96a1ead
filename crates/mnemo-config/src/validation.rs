// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as a nonzero worker pool and a window large enough
//! to hold its own overhead.

use crate::diagnostic::ConfigError;
use crate::model::{ConcurrencyMode, MnemoConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MnemoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.engine.context_window_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.context_window_tokens must be greater than zero".to_string(),
        });
    }

    if config.engine.overhead_tokens >= config.engine.context_window_tokens {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.overhead_tokens ({}) must be smaller than engine.context_window_tokens ({})",
                config.engine.overhead_tokens, config.engine.context_window_tokens
            ),
        });
    }

    if config.engine.concurrency_mode == ConcurrencyMode::Bounded
        && config.engine.max_workers == 0
    {
        errors.push(ConfigError::Validation {
            message: "engine.max_workers must be at least 1 under bounded mode".to_string(),
        });
    }

    if config.engine.chunk_char_cap == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.chunk_char_cap must be greater than zero".to_string(),
        });
    }

    if config.engine.fused_top_k == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.fused_top_k must be at least 1".to_string(),
        });
    }

    if config.ollama.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "ollama.base_url must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
