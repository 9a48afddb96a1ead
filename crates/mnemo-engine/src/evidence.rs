// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reduction of worker outcomes into an ordered evidence sheet.

use crate::types::{ChunkOutcome, ExtractionResult};

/// One extracted fact and the chunk it came from.
#[derive(Debug, Clone)]
pub struct EvidenceEntry {
    /// Index of the originating chunk.
    pub chunk_index: usize,
    /// Marker-bearing fact text as returned by the worker.
    pub fact: String,
}

/// Non-empty facts in chunk order, grounding the final answer.
#[derive(Debug, Clone)]
pub struct EvidenceSheet {
    entries: Vec<EvidenceEntry>,
}

impl EvidenceSheet {
    /// The collected entries, ordered by chunk index.
    pub fn entries(&self) -> &[EvidenceEntry] {
        &self.entries
    }

    /// Renders the sheet as a labeled block for a fallback prompt.
    pub fn as_block(&self) -> String {
        let mut block = String::from("## Extracted Evidence\n");
        for entry in &self.entries {
            block.push_str(&format!("- [chunk {}] {}\n", entry.chunk_index, entry.fact));
        }
        block
    }
}

/// Collects facts from worker outcomes into an [`EvidenceSheet`].
///
/// `NotFound` and `Failed` outcomes are uniformly "no evidence"; the
/// returned sheet is ordered by chunk index regardless of completion
/// order. Returns `None` when no facts remain, meaning the resolver must
/// fall back to full-context reasoning.
pub fn reduce(results: &[ExtractionResult]) -> Option<EvidenceSheet> {
    let mut entries: Vec<EvidenceEntry> = results
        .iter()
        .filter_map(|result| match &result.outcome {
            ChunkOutcome::Fact(fact) => Some(EvidenceEntry {
                chunk_index: result.chunk_index,
                fact: fact.clone(),
            }),
            ChunkOutcome::NotFound | ChunkOutcome::Failed(_) => None,
        })
        .collect();

    entries.sort_by_key(|entry| entry.chunk_index);

    if entries.is_empty() {
        None
    } else {
        Some(EvidenceSheet { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(chunk_index: usize, outcome: ChunkOutcome) -> ExtractionResult {
        ExtractionResult {
            chunk_index,
            outcome,
        }
    }

    #[test]
    fn all_empty_reduces_to_none() {
        let results = vec![
            result(0, ChunkOutcome::NotFound),
            result(1, ChunkOutcome::NotFound),
            result(2, ChunkOutcome::Failed("timeout".into())),
            result(3, ChunkOutcome::NotFound),
            result(4, ChunkOutcome::NotFound),
        ];
        assert!(reduce(&results).is_none());
    }

    #[test]
    fn facts_survive_in_chunk_order() {
        // Completion order scrambled; chunk order must win.
        let results = vec![
            result(3, ChunkOutcome::Fact("[FACT: tea]".into())),
            result(0, ChunkOutcome::Fact("[FACT: Paris]".into())),
            result(1, ChunkOutcome::NotFound),
            result(2, ChunkOutcome::Failed("reset".into())),
        ];

        let sheet = reduce(&results).expect("facts present");
        let order: Vec<usize> = sheet.entries().iter().map(|e| e.chunk_index).collect();
        assert_eq!(order, [0, 3]);
        assert_eq!(sheet.entries()[0].fact, "[FACT: Paris]");
    }

    #[test]
    fn failures_are_no_evidence() {
        let results = vec![
            result(0, ChunkOutcome::Failed("boom".into())),
            result(1, ChunkOutcome::Fact("[FACT: Paris]".into())),
        ];
        let sheet = reduce(&results).expect("one fact");
        assert_eq!(sheet.entries().len(), 1);
    }

    #[test]
    fn block_labels_facts_with_chunk_indices() {
        let results = vec![
            result(0, ChunkOutcome::Fact("[FACT: Paris]".into())),
            result(2, ChunkOutcome::Fact("[FACT: tea]".into())),
        ];
        let block = reduce(&results).expect("facts present").as_block();
        assert!(block.starts_with("## Extracted Evidence\n"));
        assert!(block.contains("- [chunk 0] [FACT: Paris]\n"));
        assert!(block.contains("- [chunk 2] [FACT: tea]\n"));
    }

    #[test]
    fn empty_input_reduces_to_none() {
        assert!(reduce(&[]).is_none());
    }
}
