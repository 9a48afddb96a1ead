// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-path answer assembly from the evidence sheet.
//!
//! When the sheet parses into well-formed fact tokens, the normalized
//! facts ARE the answer; no further inference call happens, so a final
//! reasoning pass can never refuse to restate data it was given. Only
//! when no usable facts exist does the resolver issue one fallback call
//! over the raw retrieved text.

use std::sync::Arc;
use std::time::Duration;

use mnemo_core::{InferenceAdapter, InferenceRequest};
use tracing::{debug, warn};

use crate::evidence::EvidenceSheet;
use crate::extract::FACT_MARKER_OPEN;

/// Degraded answer used when nothing relevant could be recalled.
pub(crate) const NO_RECALL_ANSWER: &str = "No relevant memory found.";

/// Fragments shorter than this are dropped during normalization.
const MIN_FACT_CHARS: usize = 2;

/// System prompt for the fallback reasoning call.
const FALLBACK_PROMPT: &str = r#"Answer the question using ONLY the material provided. Do not use outside knowledge. Answer in one or two short sentences. If the material does not contain the answer, say that nothing relevant was found."#;

/// Outcome of answer resolution.
#[derive(Debug)]
pub struct ResolvedAnswer {
    /// Best-effort answer text.
    pub text: String,
    /// True when the fallback reasoning call was taken.
    pub used_fallback: bool,
}

/// Terminal stage deciding between the direct and fallback paths.
pub struct AnswerResolver {
    provider: Arc<dyn InferenceAdapter>,
    request_timeout: Duration,
    max_answer_tokens: u32,
    fallback_context_chars: usize,
}

impl AnswerResolver {
    /// Creates a new resolver.
    pub fn new(
        provider: Arc<dyn InferenceAdapter>,
        request_timeout: Duration,
        max_answer_tokens: u32,
        fallback_context_chars: usize,
    ) -> Self {
        Self {
            provider,
            request_timeout,
            max_answer_tokens,
            fallback_context_chars,
        }
    }

    /// Resolves the final answer.
    ///
    /// Direct path when the evidence sheet yields well-formed facts;
    /// otherwise one fallback call over the sheet (if any) plus a
    /// truncated slice of the raw retrieved text.
    pub async fn resolve(
        &self,
        question: &str,
        evidence: Option<&EvidenceSheet>,
        raw_context: &str,
    ) -> ResolvedAnswer {
        if let Some(sheet) = evidence {
            let facts = parse_fact_tokens(sheet);
            if !facts.is_empty() {
                debug!(fact_count = facts.len(), "direct answer from evidence sheet");
                return ResolvedAnswer {
                    text: facts.join("; "),
                    used_fallback: false,
                };
            }
        }

        self.fallback(question, evidence, raw_context).await
    }

    async fn fallback(
        &self,
        question: &str,
        evidence: Option<&EvidenceSheet>,
        raw_context: &str,
    ) -> ResolvedAnswer {
        let mut material = String::new();
        if let Some(sheet) = evidence {
            material.push_str(&sheet.as_block());
            material.push('\n');
        }
        material.push_str("## Retrieved Memory\n");
        material.push_str(&truncate_chars(raw_context, self.fallback_context_chars));

        let request = InferenceRequest {
            system_prompt: Some(FALLBACK_PROMPT.to_string()),
            user_prompt: format!("Question: {question}\n\nMaterial:\n{material}"),
            max_tokens: self.max_answer_tokens,
        };

        debug!(
            material_chars = material.len(),
            "no usable facts; taking fallback reasoning path"
        );

        match tokio::time::timeout(self.request_timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => ResolvedAnswer {
                text: response.text.trim().to_string(),
                used_fallback: true,
            },
            Ok(Err(error)) => {
                warn!(%error, "fallback reasoning call failed; returning degraded answer");
                ResolvedAnswer {
                    text: NO_RECALL_ANSWER.to_string(),
                    used_fallback: true,
                }
            }
            Err(_) => {
                warn!(
                    timeout = ?self.request_timeout,
                    "fallback reasoning call timed out; returning degraded answer"
                );
                ResolvedAnswer {
                    text: NO_RECALL_ANSWER.to_string(),
                    used_fallback: true,
                }
            }
        }
    }
}

/// Extracts normalized fact payloads from every `[FACT: ...]` token on
/// the sheet, in sheet order.
fn parse_fact_tokens(sheet: &EvidenceSheet) -> Vec<String> {
    let mut facts = Vec::new();
    for entry in sheet.entries() {
        let mut rest = entry.fact.as_str();
        while let Some(start) = rest.find(FACT_MARKER_OPEN) {
            let after = &rest[start + FACT_MARKER_OPEN.len()..];
            let Some(end) = after.find(']') else {
                break;
            };
            if let Some(fact) = normalize_fact(&after[..end]) {
                facts.push(fact);
            }
            rest = &after[end + 1..];
        }
    }
    facts
}

/// Trims whitespace and trailing punctuation; drops short fragments.
fn normalize_fact(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_end_matches(['.', ',', ';', ':', '!', '?'])
        .trim_end();
    if trimmed.chars().count() < MIN_FACT_CHARS {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First `max_chars` characters of `text`, on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
