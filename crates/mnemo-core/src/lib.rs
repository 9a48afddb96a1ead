// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mnemo memory engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Mnemo workspace. The engine consumes
//! three external services through traits defined here: the document store,
//! the vector similarity service, and the inference backend.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MnemoError;
pub use types::{AdapterType, CorpusDocument, HealthStatus, InferenceRequest, InferenceResponse, RetrievalHit};

// Re-export all adapter traits at crate root.
pub use traits::{DocumentStoreAdapter, InferenceAdapter, PluginAdapter, VectorIndexAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemo_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = MnemoError::Config("test".into());
        let _storage = MnemoError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _vector = MnemoError::Vector {
            message: "test".into(),
            source: None,
        };
        let _provider = MnemoError::Provider {
            message: "test".into(),
            source: None,
        };
        let _timeout = MnemoError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = MnemoError::Internal("test".into());
    }

    #[test]
    fn adapter_type_serialization() {
        let store = AdapterType::Store;
        let json = serde_json::to_string(&store).expect("should serialize");
        let parsed: AdapterType = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(store, parsed);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // This test verifies that all adapter trait modules compile and are
        // accessible through the public API. If any module is missing or has
        // a compile error, this test won't compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_store_adapter<T: DocumentStoreAdapter>() {}
        fn _assert_vector_adapter<T: VectorIndexAdapter>() {}
        fn _assert_inference_adapter<T: InferenceAdapter>() {}
    }
}
