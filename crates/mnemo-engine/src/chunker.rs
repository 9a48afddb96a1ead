// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adaptive chunking of retrieved text for the extraction fan-out.
//!
//! Chunk size derives from the configured context window: tokens left
//! after overhead are converted to characters at a fixed ratio, then
//! capped. A larger window widens the safety margin past the cap instead
//! of producing bigger chunks.

use crate::types::ExtractionChunk;

/// Fixed conversion ratio between tokens and characters.
const CHARS_PER_TOKEN: usize = 4;

/// Floor for the token budget after subtracting overhead. Keeps a
/// misconfigured overhead from collapsing chunks to nothing.
const MIN_AVAILABLE_TOKENS: u32 = 256;

/// Computes the largest safe chunk size in characters for one
/// extraction request.
pub fn max_chunk_chars(
    context_window_tokens: u32,
    overhead_tokens: u32,
    chunk_char_cap: usize,
) -> usize {
    let available = context_window_tokens
        .saturating_sub(overhead_tokens)
        .max(MIN_AVAILABLE_TOKENS);
    (available as usize * CHARS_PER_TOKEN).min(chunk_char_cap)
}

/// Splits `text` into contiguous, non-overlapping, ordered chunks of at
/// most `max_chars` characters; the last chunk may be shorter.
///
/// Splits on character boundaries, so multibyte text never tears. Pure
/// and deterministic: identical inputs always yield identical boundaries.
/// Empty input yields no chunks.
pub fn chunk(text: &str, max_chars: usize) -> Vec<ExtractionChunk> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for ch in text.chars() {
        if current_chars == max_chars {
            chunks.push(current);
            current = String::new();
            current_chars = 0;
        }
        current.push(ch);
        current_chars += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(sequence_index, text)| ExtractionChunk {
            sequence_index,
            text,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_yields_single_identical_chunk() {
        let chunks = chunk("Alice lives in Paris.", 100);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sequence_index, 0);
        assert_eq!(chunks[0].text, "Alice lives in Paris.");
    }

    #[test]
    fn long_text_splits_contiguously() {
        let text = "abcdefghij".repeat(10); // 100 chars
        let chunks = chunk(&text, 30);

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].text.chars().count(), 30);
        assert_eq!(chunks[3].text.chars().count(), 10, "last chunk may be shorter");

        let rejoined: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(rejoined, text, "chunks must be contiguous and non-overlapping");

        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.sequence_index, i);
        }
    }

    #[test]
    fn chunking_is_idempotent() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(50);
        let first = chunk(&text, 128);
        let second = chunk(&text, 128);
        assert_eq!(first, second);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "ééééé";
        let chunks = chunk(text, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "éé");
        assert_eq!(chunks[2].text, "é");
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk("", 100).is_empty());
    }

    #[test]
    fn every_chunk_respects_the_limit() {
        let text = "x".repeat(1000);
        for max in [1, 7, 100, 999, 1000, 1001] {
            for c in chunk(&text, max) {
                assert!(c.text.chars().count() <= max);
            }
        }
    }

    #[test]
    fn max_chars_subtracts_overhead() {
        assert_eq!(max_chunk_chars(8192, 512, 100_000), (8192 - 512) * 4);
    }

    #[test]
    fn max_chars_capped_independent_of_window() {
        let small = max_chunk_chars(8192, 512, 6000);
        let huge = max_chunk_chars(200_000, 512, 6000);
        assert_eq!(small, 6000);
        assert_eq!(huge, 6000, "a larger window must not raise the cap");
    }

    #[test]
    fn max_chars_floors_at_minimum_reserve() {
        // Overhead exceeding the window falls back to the minimum budget.
        assert_eq!(max_chunk_chars(512, 4096, 100_000), 256 * 4);
    }
}
