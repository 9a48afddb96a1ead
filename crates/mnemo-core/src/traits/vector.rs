// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector similarity adapter trait for semantic retrieval.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::RetrievalHit;

/// Adapter for the external embedding/vector-similarity service.
///
/// The service owns embedding generation and nearest-neighbor search;
/// the engine only consumes ranked document ids.
#[async_trait]
pub trait VectorIndexAdapter: PluginAdapter {
    /// Returns up to `top_k` nearest-neighbor hits for the query text,
    /// most similar first, with `rank_in_source` starting at zero.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<RetrievalHit>, MnemoError>;
}
