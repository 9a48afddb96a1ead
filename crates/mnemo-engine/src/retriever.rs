// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hybrid retriever combining semantic and lexical search via RRF fusion.
//!
//! The retriever queries the vector service and the lexical index against
//! one snapshot, fuses the ranked lists with Reciprocal Rank Fusion (k=60),
//! and returns the top fused hits.

use std::collections::HashMap;
use std::sync::Arc;

use mnemo_core::{RetrievalHit, VectorIndexAdapter};
use tracing::{debug, warn};

use crate::index::{IndexSnapshot, LexicalIndex};
use crate::types::FusedHit;

/// RRF constant per research literature.
const RRF_K: f32 = 60.0;

/// Hybrid retriever over the vector service and the lexical index.
///
/// Merges both ranked lists with Reciprocal Rank Fusion; a document absent
/// from one source simply receives no contribution from it, so a strong
/// single-source match can still surface.
pub struct HybridRetriever {
    index: Arc<LexicalIndex>,
    vector: Arc<dyn VectorIndexAdapter>,
    source_top_k: usize,
    fused_top_k: usize,
}

impl HybridRetriever {
    /// Creates a new hybrid retriever.
    pub fn new(
        index: Arc<LexicalIndex>,
        vector: Arc<dyn VectorIndexAdapter>,
        source_top_k: usize,
        fused_top_k: usize,
    ) -> Self {
        Self {
            index,
            vector,
            source_top_k,
            fused_top_k,
        }
    }

    /// Retrieve the top fused hits for a query.
    ///
    /// Dereferences the index snapshot exactly once and runs both source
    /// queries against it; a sync swapping the pointer mid-call is not
    /// visible. The snapshot used is returned so the caller can resolve
    /// hit ids to text from the same corpus view.
    ///
    /// A vector-service failure degrades to lexical-only retrieval. Both
    /// sources returning empty yields an empty list; downstream handles
    /// the no-context case explicitly.
    pub async fn retrieve(&self, query: &str) -> (Vec<FusedHit>, Arc<IndexSnapshot>) {
        let snapshot = self.index.snapshot();

        let semantic = match self.vector.query(query, self.source_top_k).await {
            Ok(hits) => hits,
            Err(error) => {
                warn!(%error, "vector query failed; degrading to lexical-only retrieval");
                Vec::new()
            }
        };

        let lexical = snapshot.search(query, self.source_top_k);

        let mut fused = reciprocal_rank_fusion(&semantic, &lexical);
        fused.truncate(self.fused_top_k);

        debug!(
            semantic_hits = semantic.len(),
            lexical_hits = lexical.len(),
            fused_hits = fused.len(),
            "hybrid retrieval complete"
        );

        (fused, snapshot)
    }
}

/// Reciprocal Rank Fusion: merge two ranked lists into a single ranking.
///
/// RRF score for document d = sum(1 / (60 + rank + 1)) over each list
/// containing d. Ties break by the document's earliest appearance,
/// semantic source before lexical, then by rank within that source, so
/// the fused order is deterministic.
pub fn reciprocal_rank_fusion(
    semantic: &[RetrievalHit],
    lexical: &[RetrievalHit],
) -> Vec<FusedHit> {
    // (score, tie key); the tie key is (source priority, rank) of the
    // document's first appearance.
    let mut scores: HashMap<&str, (f32, (u8, usize))> = HashMap::new();

    for (source_priority, hits) in [semantic, lexical].into_iter().enumerate() {
        for hit in hits {
            let contribution = 1.0 / (RRF_K + hit.rank_in_source as f32 + 1.0);
            let entry = scores
                .entry(hit.document_id.as_str())
                .or_insert((0.0, (source_priority as u8, hit.rank_in_source)));
            entry.0 += contribution;
        }
    }

    let mut fused: Vec<(&str, f32, (u8, usize))> = scores
        .into_iter()
        .map(|(id, (score, tie))| (id, score, tie))
        .collect();
    fused.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.2.cmp(&b.2))
    });

    fused
        .into_iter()
        .map(|(id, score, _)| FusedHit {
            document_id: id.to_string(),
            fused_score: score,
        })
        .collect()
}
