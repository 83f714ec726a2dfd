//! Anchor resolver
//!
//! Relocates a persisted fingerprint inside the clean projection of the
//! current body. Every occurrence of the cleaned selection text is scored
//! against the captured context; the best-scoring occurrence wins, the
//! first one on ties, and is mapped back to a raw byte range. No
//! occurrence at all means the annotation is stale.

use std::ops::Range;

use super::fingerprint::{Fingerprint, CONTEXT_CHARS};
use super::projection::{normalize, CleanProjection};

/// Score for context matching exactly at the occurrence boundary.
const EXACT_CONTEXT: i32 = 20;
/// Score for context found in the neighborhood but not flush against it.
const PARTIAL_CONTEXT: i32 = 5;
/// Sentinel that never beats a scored candidate.
const NO_MATCH: i32 = -1;

/// A relocated selection: the raw byte range, the clean range it was
/// mapped from, and the score that won it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAnchor {
    pub raw: Range<usize>,
    pub clean: Range<usize>,
    pub score: i32,
}

/// Find the best raw range for `fingerprint` in the current body.
///
/// Occurrences are enumerated by full linear scan; they are rare in legal
/// prose, so no indexing is needed. Prefix and suffix contributions are
/// independent and additive. An empty cleaned context contributes nothing,
/// which is the degraded content-only path for fingerprints captured at a
/// document boundary or persisted without context.
pub fn resolve(
    fingerprint: &Fingerprint,
    projection: &CleanProjection<'_>,
) -> Option<ResolvedAnchor> {
    let needle = normalize(&fingerprint.selection_text);
    if needle.is_empty() {
        return None;
    }

    let clean = projection.clean();
    if needle.len() > clean.len() {
        return None;
    }

    let prefix = normalize(&fingerprint.prefix);
    let suffix = normalize(&fingerprint.suffix);

    let mut best_score = NO_MATCH;
    let mut best_start = None;

    for start in 0..=clean.len() - needle.len() {
        if clean[start..start + needle.len()] != needle[..] {
            continue;
        }
        let score = score_occurrence(clean, start, needle.len(), &prefix, &suffix);
        if score > best_score {
            best_score = score;
            best_start = Some(start);
        }
    }

    let start = best_start?;
    let clean_range = start..start + needle.len();
    let raw = projection.raw_span(clean_range.clone())?;
    Some(ResolvedAnchor {
        raw,
        clean: clean_range,
        score: best_score,
    })
}

fn score_occurrence(
    clean: &[char],
    start: usize,
    len: usize,
    prefix: &[char],
    suffix: &[char],
) -> i32 {
    let mut score = 0;

    if !prefix.is_empty() {
        let window_start = start.saturating_sub(prefix.len());
        if clean[window_start..start] == *prefix {
            score += EXACT_CONTEXT;
        } else {
            let near_start = start.saturating_sub(CONTEXT_CHARS);
            if contains(&clean[near_start..start], prefix) {
                score += PARTIAL_CONTEXT;
            }
        }
    }

    let end = start + len;
    if !suffix.is_empty() {
        let window_end = (end + suffix.len()).min(clean.len());
        if clean[end..window_end] == *suffix {
            score += EXACT_CONTEXT;
        } else {
            let near_end = (end + CONTEXT_CHARS).min(clean.len());
            if contains(&clean[end..near_end], suffix) {
                score += PARTIAL_CONTEXT;
            }
        }
    }

    score
}

fn contains(haystack: &[char], needle: &[char]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}
