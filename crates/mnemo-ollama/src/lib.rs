// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama inference adapter for the Mnemo memory engine.
//!
//! This crate implements [`InferenceAdapter`] over the Ollama generate
//! API, giving the engine a local-first inference backend.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use mnemo_config::OllamaConfig;
use mnemo_core::{
    AdapterType, HealthStatus, InferenceAdapter, InferenceRequest, InferenceResponse, MnemoError,
    PluginAdapter,
};
use tracing::info;

use crate::client::OllamaClient;
use crate::types::{GenerateOptions, GenerateRequest};

/// Ollama inference backend implementing [`InferenceAdapter`].
pub struct OllamaProvider {
    client: OllamaClient,
    model: String,
}

impl OllamaProvider {
    /// Creates a new Ollama provider from the given configuration.
    pub fn new(config: &OllamaConfig) -> Result<Self, MnemoError> {
        let client = OllamaClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )?;

        info!(
            base_url = config.base_url,
            model = config.model,
            "Ollama provider initialized"
        );

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    /// Converts an engine [`InferenceRequest`] to an Ollama [`GenerateRequest`].
    fn to_generate_request(&self, request: &InferenceRequest) -> GenerateRequest {
        GenerateRequest {
            model: self.model.clone(),
            prompt: request.user_prompt.clone(),
            system: request.system_prompt.clone(),
            stream: false,
            options: GenerateOptions {
                num_predict: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl PluginAdapter for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        match self.client.version().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(error) => Ok(HealthStatus::Unhealthy(error.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl InferenceAdapter for OllamaProvider {
    async fn complete(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, MnemoError> {
        let generate_request = self.to_generate_request(&request);
        let response = self.client.generate(&generate_request).await?;
        Ok(InferenceResponse {
            text: response.response,
        })
    }
}
