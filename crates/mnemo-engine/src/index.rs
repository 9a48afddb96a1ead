// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory lexical index over the memory corpus.
//!
//! The index holds read-only cached copies of the corpus and ranks them
//! with BM25. Each rebuild produces an immutable [`IndexSnapshot`] swapped
//! in atomically; concurrent queries keep whatever snapshot they loaded
//! and never observe a half-built index.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use mnemo_core::{CorpusDocument, DocumentStoreAdapter, MnemoError, RetrievalHit};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// BM25 term-frequency saturation parameter.
const BM25_K1: f32 = 1.2;
/// BM25 length-normalization parameter.
const BM25_B: f32 = 0.75;

/// An immutable build of the lexical index.
///
/// Holds the cached corpus, BM25 postings, and per-document lengths.
#[derive(Debug)]
pub struct IndexSnapshot {
    documents: Vec<CorpusDocument>,
    id_to_idx: HashMap<String, usize>,
    /// term -> (document index, term frequency)
    postings: HashMap<String, Vec<(usize, u32)>>,
    doc_lens: Vec<u32>,
    avg_doc_len: f32,
}

impl IndexSnapshot {
    /// The snapshot used before any sync has succeeded.
    pub fn empty() -> Self {
        Self {
            documents: Vec::new(),
            id_to_idx: HashMap::new(),
            postings: HashMap::new(),
            doc_lens: Vec::new(),
            avg_doc_len: 0.0,
        }
    }

    /// Builds a snapshot from a corpus fetch.
    pub fn build(documents: Vec<CorpusDocument>) -> Self {
        let mut id_to_idx = HashMap::with_capacity(documents.len());
        let mut postings: HashMap<String, Vec<(usize, u32)>> = HashMap::new();
        let mut doc_lens = Vec::with_capacity(documents.len());

        for (idx, document) in documents.iter().enumerate() {
            id_to_idx.insert(document.id.clone(), idx);

            let mut term_freqs: HashMap<String, u32> = HashMap::new();
            let mut doc_len = 0u32;
            for term in tokenize(&document.text) {
                *term_freqs.entry(term).or_insert(0) += 1;
                doc_len += 1;
            }
            doc_lens.push(doc_len);

            for (term, tf) in term_freqs {
                postings.entry(term).or_default().push((idx, tf));
            }
        }

        let avg_doc_len = if doc_lens.is_empty() {
            0.0
        } else {
            doc_lens.iter().sum::<u32>() as f32 / doc_lens.len() as f32
        };

        Self {
            documents,
            id_to_idx,
            postings,
            doc_lens,
            avg_doc_len,
        }
    }

    /// Number of documents in this snapshot.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when no corpus has been indexed yet.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Looks up a cached document by id.
    pub fn get(&self, document_id: &str) -> Option<&CorpusDocument> {
        self.id_to_idx
            .get(document_id)
            .map(|&idx| &self.documents[idx])
    }

    /// Ranks the corpus against `query` with BM25 and returns the top
    /// `top_k` hits, best first. Score ties break by document id so the
    /// ranking is stable across rebuilds.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<RetrievalHit> {
        if self.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scores: HashMap<usize, f32> = HashMap::new();
        let doc_count = self.documents.len() as f32;

        for term in tokenize(query) {
            let Some(posting) = self.postings.get(&term) else {
                continue;
            };
            let df = posting.len() as f32;
            let idf = ((doc_count - df + 0.5) / (df + 0.5) + 1.0).ln();
            for &(doc_idx, tf) in posting {
                let tf = tf as f32;
                let norm_len = self.doc_lens[doc_idx] as f32 / self.avg_doc_len;
                let score =
                    idf * (tf * (BM25_K1 + 1.0)) / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * norm_len));
                *scores.entry(doc_idx).or_insert(0.0) += score;
            }
        }

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| self.documents[a.0].id.cmp(&self.documents[b.0].id))
        });
        ranked.truncate(top_k);

        ranked
            .into_iter()
            .enumerate()
            .map(|(rank, (doc_idx, _))| RetrievalHit {
                document_id: self.documents[doc_idx].id.clone(),
                rank_in_source: rank,
            })
            .collect()
    }
}

/// Rebuild bookkeeping, touched only under the sync lock.
#[derive(Debug, Default)]
struct SyncState {
    last_built: Option<Instant>,
    last_count: usize,
}

/// Lazily rebuilt lexical index shared across concurrent queries.
///
/// Readers load the current snapshot without locks; rebuilds serialize on
/// an internal mutex and publish via one atomic pointer swap.
pub struct LexicalIndex {
    store: Arc<dyn DocumentStoreAdapter>,
    snapshot: ArcSwap<IndexSnapshot>,
    resync_interval: Duration,
    sync_state: Mutex<SyncState>,
}

impl LexicalIndex {
    /// Creates an index with an empty initial snapshot.
    pub fn new(store: Arc<dyn DocumentStoreAdapter>, resync_interval: Duration) -> Self {
        Self {
            store,
            snapshot: ArcSwap::from_pointee(IndexSnapshot::empty()),
            resync_interval,
            sync_state: Mutex::new(SyncState::default()),
        }
    }

    /// Loads the current snapshot.
    ///
    /// Callers hold the returned `Arc` for their whole query; a concurrent
    /// sync replaces the pointer without invalidating it.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.snapshot.load_full()
    }

    /// Rebuilds the index from storage when stale, or unconditionally when
    /// `force` is set.
    ///
    /// Without `force`, a rebuild happens only if no snapshot was ever
    /// built, or the resync interval has elapsed AND the store's document
    /// count changed since the last build. On failure the previous snapshot
    /// stays in place and the rebuild is retried on the next call.
    pub async fn sync(&self, force: bool) -> Result<(), MnemoError> {
        let mut state = self.sync_state.lock().await;

        if !force && let Some(last_built) = state.last_built {
            if last_built.elapsed() < self.resync_interval {
                return Ok(());
            }
            let count = self.store.count_documents().await?;
            if count == state.last_count {
                debug!(doc_count = count, "corpus unchanged; skipping index rebuild");
                // Restart the interval so a large stable corpus is not
                // re-counted on every query.
                state.last_built = Some(Instant::now());
                return Ok(());
            }
        }

        let documents = self.store.list_documents().await?;
        let doc_count = documents.len();
        self.snapshot.store(Arc::new(IndexSnapshot::build(documents)));
        state.last_built = Some(Instant::now());
        state.last_count = doc_count;

        info!(doc_count, forced = force, "lexical index rebuilt");
        Ok(())
    }
}

/// Lowercased alphanumeric terms of `text`.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}
