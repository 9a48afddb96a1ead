// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference adapter trait for text-generation backends.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InferenceRequest, InferenceResponse};

/// Adapter for text-generation inference backends (Ollama, hosted APIs).
///
/// An empty completion is a valid success and is typed distinctly from
/// transport or API failures, which surface as [`MnemoError::Provider`].
#[async_trait]
pub trait InferenceAdapter: PluginAdapter {
    /// Sends a single-shot completion request and returns the full response.
    async fn complete(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, MnemoError>;
}
