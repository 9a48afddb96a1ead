// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama generate API.
//!
//! Provides [`OllamaClient`] which handles request construction and
//! transient error retry against a local or remote Ollama server.

use std::time::Duration;

use mnemo_core::MnemoError;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateRequest, GenerateResponse};

/// HTTP client for Ollama API communication.
///
/// Manages connection pooling and retry logic for transient errors
/// (429, 500, 503).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl OllamaClient {
    /// Creates a new Ollama API client.
    ///
    /// # Arguments
    /// * `base_url` - Server base URL (e.g., "http://127.0.0.1:11434")
    /// * `timeout` - Whole-request timeout applied by the HTTP client
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, MnemoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MnemoError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a non-streaming generate request and returns the full response.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, MnemoError> {
        let url = format!("{}/api/generate", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generate request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| MnemoError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "generate response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| MnemoError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let generate_response: GenerateResponse =
                    serde_json::from_str(&body).map_err(|e| MnemoError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(generate_response);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(MnemoError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let error_msg = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("Ollama API error: {}", api_err.error)
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(MnemoError::Provider {
                message: error_msg,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| MnemoError::Provider {
            message: "generate request failed after retries".into(),
            source: None,
        }))
    }

    /// Probes the server's version endpoint.
    pub async fn version(&self) -> Result<(), MnemoError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MnemoError::Provider {
                message: format!("version probe failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(MnemoError::Provider {
                message: format!("version probe returned {}", response.status()),
                source: None,
            })
        }
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerateOptions;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_request() -> GenerateRequest {
        GenerateRequest {
            model: "llama3.1:8b".into(),
            prompt: "Where does Alice live?".into(),
            system: Some("Answer briefly.".into()),
            stream: false,
            options: GenerateOptions { num_predict: 128 },
        }
    }

    fn test_client(base_url: &str) -> OllamaClient {
        OllamaClient::new(base_url.to_string(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3.1:8b",
                "stream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.1:8b",
                "response": "[FACT: Paris]",
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.generate(&test_request()).await.expect("should succeed");
        assert_eq!(response.response, "[FACT: Paris]");
    }

    #[tokio::test]
    async fn generate_retries_transient_error_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "Paris",
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.generate(&test_request()).await.expect("retry should succeed");
        assert_eq!(response.response, "Paris");
    }

    #[tokio::test]
    async fn generate_surfaces_api_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "model 'nope' not found",
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let error = client.generate(&test_request()).await.expect_err("should fail");
        assert!(error.to_string().contains("model 'nope' not found"));
    }

    #[tokio::test]
    async fn generate_gives_up_after_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.generate(&test_request()).await.is_err());
    }

    #[tokio::test]
    async fn version_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"version": "0.5.1"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.version().await.is_ok());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = test_client("http://localhost:11434/");
        assert_eq!(client.base_url(), "http://localhost:11434");
    }
}
