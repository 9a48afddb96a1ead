// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primary entry point wiring the pipeline phases together.
//!
//! One question flows through strictly sequential phases: lazy index
//! sync, hybrid retrieval, context assembly, adaptive chunking, the
//! extraction fan-out, reduction, and answer resolution. Only the
//! extraction phase is internally concurrent.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mnemo_config::EngineConfig;
use mnemo_core::{
    CorpusDocument, DocumentStoreAdapter, InferenceAdapter, MnemoError, VectorIndexAdapter,
};
use tracing::{info, warn};

use crate::chunker;
use crate::evidence;
use crate::extract::{ExtractionSettings, FactExtractor};
use crate::index::{IndexSnapshot, LexicalIndex};
use crate::resolver::{AnswerResolver, NO_RECALL_ANSWER};
use crate::retriever::HybridRetriever;
use crate::types::{FusedHit, RecallAnswer};

/// The retrieval-and-fact-extraction engine.
///
/// Holds the lexical index shared across queries plus the per-phase
/// components. Everything else is created per question.
pub struct RecallEngine {
    config: EngineConfig,
    store: Arc<dyn DocumentStoreAdapter>,
    index: Arc<LexicalIndex>,
    retriever: HybridRetriever,
    extractor: FactExtractor,
    resolver: AnswerResolver,
}

impl RecallEngine {
    /// Wires an engine from the three external services and its configuration.
    pub fn new(
        store: Arc<dyn DocumentStoreAdapter>,
        vector: Arc<dyn VectorIndexAdapter>,
        provider: Arc<dyn InferenceAdapter>,
        config: EngineConfig,
    ) -> Self {
        let index = Arc::new(LexicalIndex::new(
            Arc::clone(&store),
            Duration::from_secs(config.index_resync_interval_seconds),
        ));
        let retriever = HybridRetriever::new(
            Arc::clone(&index),
            vector,
            config.source_top_k,
            config.fused_top_k,
        );
        let extractor = FactExtractor::new(
            Arc::clone(&provider),
            ExtractionSettings::from_config(&config),
        );
        let resolver = AnswerResolver::new(
            provider,
            Duration::from_secs(config.request_timeout_seconds),
            config.max_answer_tokens,
            config.fallback_context_chars,
        );

        Self {
            config,
            store,
            index,
            retriever,
            extractor,
            resolver,
        }
    }

    /// Rebuilds the lexical index now (forced) or if stale.
    pub async fn sync_index(&self, force: bool) -> Result<(), MnemoError> {
        self.index.sync(force).await
    }

    /// Answers a question from stored memories, best effort.
    ///
    /// Partial failures degrade the answer instead of aborting: a failed
    /// sync serves the previous snapshot, a failed retrieval source
    /// degrades to the other, failed extraction workers contribute no
    /// evidence, and an empty retrieval yields the degraded no-context
    /// answer without any inference call.
    pub async fn answer(&self, question: &str) -> Result<RecallAnswer, MnemoError> {
        let retrieval_started = Instant::now();

        if let Err(error) = self.index.sync(false).await {
            warn!(%error, "index sync failed; serving previous snapshot");
        }

        let (hits, snapshot) = self.retriever.retrieve(question).await;
        let context = self.assemble_context(&hits, &snapshot).await;
        let retrieval_seconds = retrieval_started.elapsed().as_secs_f64();

        if context.is_empty() {
            info!(retrieval_seconds, "no retrieval context; returning degraded answer");
            return Ok(RecallAnswer {
                answer: NO_RECALL_ANSWER.to_string(),
                retrieval_seconds,
                inference_seconds: 0.0,
            });
        }

        let inference_started = Instant::now();

        let max_chars = chunker::max_chunk_chars(
            self.config.context_window_tokens,
            self.config.overhead_tokens,
            self.config.chunk_char_cap,
        );
        let chunks = chunker::chunk(&context, max_chars);
        let results = self.extractor.extract_all(question, &chunks).await;
        let sheet = evidence::reduce(&results);
        let resolved = self
            .resolver
            .resolve(question, sheet.as_ref(), &context)
            .await;

        let inference_seconds = inference_started.elapsed().as_secs_f64();

        info!(
            fused_hits = hits.len(),
            chunk_count = chunks.len(),
            evidence_count = sheet.as_ref().map_or(0, |s| s.entries().len()),
            used_fallback = resolved.used_fallback,
            retrieval_seconds,
            inference_seconds,
            "recall complete"
        );

        Ok(RecallAnswer {
            answer: resolved.text,
            retrieval_seconds,
            inference_seconds,
        })
    }

    /// Resolves fused hits to document text, preserving fused order.
    ///
    /// The snapshot cache answers most lookups; ids the snapshot lacks
    /// (a vector-only hit before the first successful sync) fall back to
    /// the store. A failed store lookup skips those ids.
    async fn assemble_context(&self, hits: &[FusedHit], snapshot: &IndexSnapshot) -> String {
        let mut texts: Vec<Option<String>> = Vec::with_capacity(hits.len());
        let mut missing: Vec<(usize, String)> = Vec::new();

        for (position, hit) in hits.iter().enumerate() {
            match snapshot.get(&hit.document_id) {
                Some(document) => texts.push(Some(document.text.clone())),
                None => {
                    texts.push(None);
                    missing.push((position, hit.document_id.clone()));
                }
            }
        }

        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(|(_, id)| id.clone()).collect();
            match self.store.fetch_documents(&ids).await {
                Ok(documents) => {
                    let by_id: HashMap<&str, &CorpusDocument> =
                        documents.iter().map(|d| (d.id.as_str(), d)).collect();
                    for (position, id) in &missing {
                        if let Some(document) = by_id.get(id.as_str()) {
                            texts[*position] = Some(document.text.clone());
                        }
                    }
                }
                Err(error) => {
                    warn!(%error, missing = ids.len(), "failed to resolve hits missing from snapshot");
                }
            }
        }

        texts.into_iter().flatten().collect::<Vec<_>>().join("\n\n")
    }
}
