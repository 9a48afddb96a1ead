// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama generate API request/response types.

use serde::{Deserialize, Serialize};

/// A request to the Ollama `/api/generate` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g., "llama3.1:8b").
    pub model: String,

    /// The user prompt text.
    pub prompt: String,

    /// System prompt steering the completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Always false; the engine consumes single-shot completions.
    pub stream: bool,

    /// Generation options.
    pub options: GenerateOptions,
}

/// Generation options for a generate request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    /// Maximum tokens to generate.
    pub num_predict: u32,
}

/// A non-streaming response from `/api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// The generated completion text.
    pub response: String,

    /// Whether generation ran to completion.
    #[serde(default)]
    pub done: bool,
}

/// An error body returned by the Ollama API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable error description.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_without_empty_system() {
        let request = GenerateRequest {
            model: "llama3.1:8b".into(),
            prompt: "hello".into(),
            system: None,
            stream: false,
            options: GenerateOptions { num_predict: 128 },
        };
        let json = serde_json::to_string(&request).expect("should serialize");
        assert!(!json.contains("system"));
        assert!(json.contains("\"num_predict\":128"));
    }

    #[test]
    fn response_deserializes() {
        let json = r#"{"model":"llama3.1:8b","response":"Paris","done":true}"#;
        let response: GenerateResponse = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(response.response, "Paris");
        assert!(response.done);
    }

    #[test]
    fn error_body_deserializes() {
        let json = r#"{"error":"model not found"}"#;
        let error: ApiErrorResponse = serde_json::from_str(json).expect("should deserialize");
        assert_eq!(error.error, "model not found");
    }
}
