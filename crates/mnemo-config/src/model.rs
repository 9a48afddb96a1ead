// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mnemo memory engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Mnemo configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MnemoConfig {
    /// Retrieval and extraction engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Ollama inference backend settings.
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Fan-out strategy for the per-chunk extraction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    /// Every chunk's extraction request is in flight simultaneously.
    /// Maximum throughput; peak backend load scales with chunk count.
    Unbounded,
    /// A counting semaphore of `max_workers` permits gates request entry.
    /// Fixed worst-case concurrent load; preferred on constrained hardware.
    Bounded,
}

/// Retrieval and extraction engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Context window of the inference backend, in tokens (prompt + output).
    #[serde(default = "default_context_window_tokens")]
    pub context_window_tokens: u32,

    /// Tokens reserved for prompt scaffolding and the expected output.
    #[serde(default = "default_overhead_tokens")]
    pub overhead_tokens: u32,

    /// Fan-out strategy for extraction workers.
    #[serde(default = "default_concurrency_mode")]
    pub concurrency_mode: ConcurrencyMode,

    /// Semaphore size for bounded mode. Ignored under unbounded mode.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Hard cap on chunk size in characters, independent of window size.
    #[serde(default = "default_chunk_char_cap")]
    pub chunk_char_cap: usize,

    /// Minimum seconds between lexical index rebuilds triggered by
    /// corpus growth. Forced syncs ignore this.
    #[serde(default = "default_index_resync_interval_seconds")]
    pub index_resync_interval_seconds: u64,

    /// Candidates requested from each retrieval source (pre-fusion).
    #[serde(default = "default_source_top_k")]
    pub source_top_k: usize,

    /// Fused hits kept after Reciprocal Rank Fusion.
    #[serde(default = "default_fused_top_k")]
    pub fused_top_k: usize,

    /// Per-request timeout for inference calls, in seconds.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Maximum tokens any single engine inference call may generate.
    #[serde(default = "default_max_answer_tokens")]
    pub max_answer_tokens: u32,

    /// Characters of raw retrieved text included in a fallback prompt.
    #[serde(default = "default_fallback_context_chars")]
    pub fallback_context_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_window_tokens: default_context_window_tokens(),
            overhead_tokens: default_overhead_tokens(),
            concurrency_mode: default_concurrency_mode(),
            max_workers: default_max_workers(),
            chunk_char_cap: default_chunk_char_cap(),
            index_resync_interval_seconds: default_index_resync_interval_seconds(),
            source_top_k: default_source_top_k(),
            fused_top_k: default_fused_top_k(),
            request_timeout_seconds: default_request_timeout_seconds(),
            max_answer_tokens: default_max_answer_tokens(),
            fallback_context_chars: default_fallback_context_chars(),
        }
    }
}

/// Ollama inference backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model identifier passed to the generate endpoint.
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// HTTP client timeout, in seconds.
    #[serde(default = "default_ollama_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
            request_timeout_seconds: default_ollama_timeout_seconds(),
        }
    }
}

fn default_context_window_tokens() -> u32 {
    8192
}

fn default_overhead_tokens() -> u32 {
    512
}

fn default_concurrency_mode() -> ConcurrencyMode {
    ConcurrencyMode::Bounded
}

fn default_max_workers() -> usize {
    4
}

fn default_chunk_char_cap() -> usize {
    6000
}

fn default_index_resync_interval_seconds() -> u64 {
    300
}

fn default_source_top_k() -> usize {
    10
}

fn default_fused_top_k() -> usize {
    5
}

fn default_request_timeout_seconds() -> u64 {
    120
}

fn default_max_answer_tokens() -> u32 {
    512
}

fn default_fallback_context_chars() -> usize {
    6000
}

fn default_ollama_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_ollama_timeout_seconds() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.context_window_tokens, 8192);
        assert_eq!(config.overhead_tokens, 512);
        assert_eq!(config.concurrency_mode, ConcurrencyMode::Bounded);
        assert_eq!(config.max_workers, 4);
        assert_eq!(config.source_top_k, 10);
        assert_eq!(config.fused_top_k, 5);
    }

    #[test]
    fn concurrency_mode_lowercase_serde() {
        let mode: ConcurrencyMode =
            serde_json::from_str("\"unbounded\"").expect("should deserialize");
        assert_eq!(mode, ConcurrencyMode::Unbounded);

        let json = serde_json::to_string(&ConcurrencyMode::Bounded).expect("should serialize");
        assert_eq!(json, "\"bounded\"");
    }

    #[test]
    fn full_config_default_is_valid() {
        let config = MnemoConfig::default();
        assert_eq!(config.ollama.base_url, "http://127.0.0.1:11434");
        assert!(config.engine.fused_top_k <= config.engine.source_top_k);
    }
}
