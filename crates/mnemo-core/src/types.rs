// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Mnemo engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter plugged into the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    /// Durable document storage holding the raw memory corpus.
    Store,
    /// Vector similarity service for semantic nearest-neighbor queries.
    Vector,
    /// Text-generation inference backend.
    Provider,
}

/// A stored memory document as held by the document store.
///
/// The engine's lexical index keeps read-only cached copies of these;
/// ownership stays with the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    /// Unique identifier assigned by the store.
    pub id: String,
    /// Raw memory text.
    pub text: String,
    /// Opaque metadata attached at write time.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// A single ranked hit from one retrieval source (semantic or lexical).
///
/// Ephemeral: discarded after rank fusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalHit {
    /// Identifier of the matched document.
    pub document_id: String,
    /// Zero-based rank within the source's result list.
    pub rank_in_source: usize,
}

/// A single-shot request to the inference backend.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Optional system prompt steering the completion.
    pub system_prompt: Option<String>,
    /// The user-visible prompt text.
    pub user_prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// A completed response from the inference backend.
///
/// An empty `text` is a valid success; transport and API failures are
/// reported as [`crate::MnemoError::Provider`] instead.
#[derive(Debug, Clone)]
pub struct InferenceResponse {
    /// The generated completion text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_display_roundtrip() {
        use std::str::FromStr;

        for variant in [AdapterType::Store, AdapterType::Vector, AdapterType::Provider] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn corpus_document_metadata_optional() {
        let json = r#"{"id": "d1", "text": "Alice lives in Paris."}"#;
        let doc: CorpusDocument = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(doc.id, "d1");
        assert!(doc.metadata.is_none());

        let json = r#"{"id": "d2", "text": "Bob likes tea.", "metadata": {"source": "chat"}}"#;
        let doc: CorpusDocument = serde_json::from_str(json).expect("should deserialize");
        assert!(doc.metadata.is_some());
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }
}
