// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store adapter trait for the durable memory corpus.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::CorpusDocument;

/// Adapter for the durable storage layer holding raw memory documents.
///
/// The engine never writes through this trait; it reads the corpus to
/// build its lexical index and to resolve retrieval hits to text.
#[async_trait]
pub trait DocumentStoreAdapter: PluginAdapter {
    /// Fetches the full corpus for an index rebuild.
    async fn list_documents(&self) -> Result<Vec<CorpusDocument>, MnemoError>;

    /// Returns the current document count.
    ///
    /// Must be cheap; used as the staleness probe before deciding
    /// whether a full rebuild is worth it.
    async fn count_documents(&self) -> Result<usize, MnemoError>;

    /// Fetches specific documents by id.
    ///
    /// Unknown ids are skipped, not errors.
    async fn fetch_documents(&self, ids: &[String]) -> Result<Vec<CorpusDocument>, MnemoError>;
}
