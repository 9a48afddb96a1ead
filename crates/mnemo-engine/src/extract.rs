// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scatter-gather fact extraction over retrieved chunks.
//!
//! One worker per chunk asks the inference backend whether its chunk
//! answers the question. The governor decides how many requests may be in
//! flight: unbounded fan-out for throughput, or a counting semaphore for a
//! fixed worst-case backend load. Workers fail open: any transport error
//! or timeout becomes an empty outcome and never aborts the batch.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use mnemo_config::{ConcurrencyMode, EngineConfig};
use mnemo_core::{InferenceAdapter, InferenceRequest};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

use crate::types::{ChunkOutcome, ExtractionChunk, ExtractionResult};

/// Marker the extraction prompt asks for when a chunk answers the question.
pub(crate) const FACT_MARKER_OPEN: &str = "[FACT:";

/// Sentinel the extraction prompt asks for when a chunk does not.
const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

/// System prompt for per-chunk extraction calls.
const EXTRACTION_PROMPT: &str = r#"You scan one piece of stored memory context for the answer to a question.

If the context answers the question, output the answer as a short fact in exactly this form:
[FACT: <the fact>]

If the context does not answer the question, output exactly:
NOT_FOUND

Output the marker or the sentinel and nothing else. Do not explain."#;

/// Tuning for one extraction fan-out, derived from engine configuration.
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    /// Fan-out strategy.
    pub mode: ConcurrencyMode,
    /// Semaphore size under bounded mode.
    pub max_workers: usize,
    /// Per-request timeout; a timed-out worker counts as a failed worker.
    pub request_timeout: Duration,
    /// Generation budget per extraction call.
    pub max_answer_tokens: u32,
}

impl ExtractionSettings {
    /// Derives extraction settings from the engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mode: config.concurrency_mode,
            max_workers: config.max_workers,
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
            max_answer_tokens: config.max_answer_tokens,
        }
    }
}

/// Admission strategy for one `extract_all` call.
///
/// Selected once per call; the semaphore is scoped to that call, not a
/// process-wide limiter. Concurrent user queries can still oversubscribe
/// the backend without an additional outer limiter.
enum Governor {
    /// Every request in flight simultaneously.
    Unbounded,
    /// Entry gated by a counting semaphore.
    Bounded(Arc<Semaphore>),
}

impl Governor {
    fn for_settings(settings: &ExtractionSettings) -> Self {
        match settings.mode {
            ConcurrencyMode::Unbounded => Governor::Unbounded,
            ConcurrencyMode::Bounded => {
                Governor::Bounded(Arc::new(Semaphore::new(settings.max_workers.max(1))))
            }
        }
    }

    /// Waits for admission. The returned permit, if any, is held for the
    /// duration of the worker's request.
    async fn admit(&self) -> Option<OwnedSemaphorePermit> {
        match self {
            Governor::Unbounded => None,
            // acquire_owned only fails on a closed semaphore; this one is
            // never closed, and fail-open means proceeding ungated anyway.
            Governor::Bounded(semaphore) => semaphore.clone().acquire_owned().await.ok(),
        }
    }
}

/// Runs the per-chunk extraction fan-out.
pub struct FactExtractor {
    provider: Arc<dyn InferenceAdapter>,
    settings: ExtractionSettings,
}

impl FactExtractor {
    /// Creates a new extractor.
    pub fn new(provider: Arc<dyn InferenceAdapter>, settings: ExtractionSettings) -> Self {
        Self { provider, settings }
    }

    /// Asks the backend, once per chunk, whether the chunk answers the
    /// question. All workers are submitted at once; under bounded mode a
    /// semaphore gates how many requests are actually in flight, with no
    /// defined processing order for queued workers.
    ///
    /// Always returns one result per chunk: errors and timeouts are
    /// converted to empty outcomes, never raised.
    pub async fn extract_all(
        &self,
        question: &str,
        chunks: &[ExtractionChunk],
    ) -> Vec<ExtractionResult> {
        let governor = Governor::for_settings(&self.settings);

        debug!(
            chunk_count = chunks.len(),
            mode = ?self.settings.mode,
            "dispatching extraction workers"
        );

        let workers = chunks.iter().map(|chunk| {
            let governor = &governor;
            async move {
                let _permit = governor.admit().await;
                let outcome = self.extract_chunk(question, chunk).await;
                ExtractionResult {
                    chunk_index: chunk.sequence_index,
                    outcome,
                }
            }
        });

        join_all(workers).await
    }

    /// One worker: a single inference request for a single chunk.
    async fn extract_chunk(&self, question: &str, chunk: &ExtractionChunk) -> ChunkOutcome {
        let request = InferenceRequest {
            system_prompt: Some(EXTRACTION_PROMPT.to_string()),
            user_prompt: format!("Question: {question}\n\nContext:\n{}", chunk.text),
            max_tokens: self.settings.max_answer_tokens,
        };

        match tokio::time::timeout(self.settings.request_timeout, self.provider.complete(request))
            .await
        {
            Ok(Ok(response)) => parse_worker_response(&response.text),
            Ok(Err(error)) => {
                warn!(
                    chunk_index = chunk.sequence_index,
                    %error,
                    "extraction worker failed; treating chunk as unanswered"
                );
                ChunkOutcome::Failed(error.to_string())
            }
            Err(_) => {
                warn!(
                    chunk_index = chunk.sequence_index,
                    timeout = ?self.settings.request_timeout,
                    "extraction worker timed out; treating chunk as unanswered"
                );
                ChunkOutcome::Failed(format!(
                    "timed out after {:?}",
                    self.settings.request_timeout
                ))
            }
        }
    }
}

/// Interprets a worker's raw completion.
///
/// Strips reasoning markup, then collects every complete `[FACT: ...]`
/// token. The sentinel, a missing marker, or a marker with no closing
/// bracket all mean "not found".
pub(crate) fn parse_worker_response(raw: &str) -> ChunkOutcome {
    let cleaned = strip_reasoning_markup(raw);
    let cleaned = cleaned.trim();

    let mut tokens: Vec<&str> = Vec::new();
    let mut rest = cleaned;
    while let Some(start) = rest.find(FACT_MARKER_OPEN) {
        let candidate = &rest[start..];
        match candidate.find(']') {
            Some(end) => {
                tokens.push(&candidate[..=end]);
                rest = &candidate[end + 1..];
            }
            None => break,
        }
    }

    if tokens.is_empty() {
        ChunkOutcome::NotFound
    } else {
        ChunkOutcome::Fact(tokens.join(" "))
    }
}

/// Removes `<think>...</think>` spans some local models emit before the
/// requested output. An unterminated span is dropped to the end of the text.
fn strip_reasoning_markup(text: &str) -> String {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);
        match rest[start..].find(CLOSE) {
            Some(end) => rest = &rest[start + end + CLOSE.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    result.push_str(rest);
    result
}
