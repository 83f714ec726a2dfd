//! Context fingerprint capture
//!
//! Derives a position-independent description of a completed selection:
//! the selected text, up to sixty characters of rendered context on each
//! side, and an advisory location id taken from the nearest preceding
//! structural anchor. The fingerprint is what the store persists; raw
//! offsets are never trusted across renders.

use std::collections::VecDeque;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::projection::anchors;

/// Rendered-context window kept on each side of a selection, in characters.
pub const CONTEXT_CHARS: usize = 60;

/// Position-independent description of a text selection.
///
/// `prefix` and `suffix` may be empty when the selection sits at a
/// document boundary. `location_id` names the nearest structural anchor at
/// capture time; it is advisory only and never participates in scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    pub selection_text: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

/// A captured selection: the fingerprint to persist plus the byte offset
/// where the note editor opens on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSelection {
    pub fingerprint: Fingerprint,
    pub anchor_offset: usize,
}

/// Capture a completed selection over `body`.
///
/// Returns `None` when the selection trims to nothing or does not fall on
/// character boundaries; capture is a silent no-op in both cases.
pub fn capture(body: &str, selection: Range<usize>) -> Option<CapturedSelection> {
    let text = body.get(selection.clone())?;
    if text.trim().is_empty() {
        return None;
    }

    let (prefix, suffix) = surrounding_context(body, &selection);
    let location_id = locate(body, selection.start);

    Some(CapturedSelection {
        fingerprint: Fingerprint {
            selection_text: text.to_string(),
            prefix,
            suffix,
            location_id,
        },
        anchor_offset: selection.start,
    })
}

/// Up to [`CONTEXT_CHARS`] rendered characters on each side of the
/// selection, clipped at document boundaries. Tag contents are skipped;
/// punctuation and whitespace stay, since normalization happens at
/// matching time.
fn surrounding_context(body: &str, selection: &Range<usize>) -> (String, String) {
    let mut before: VecDeque<char> = VecDeque::with_capacity(CONTEXT_CHARS);
    let mut after = String::new();
    let mut after_count = 0;
    let mut in_tag = false;

    for (offset, ch) in body.char_indices() {
        if in_tag {
            if ch == '>' {
                in_tag = false;
            }
            continue;
        }
        if ch == '<' {
            in_tag = true;
            continue;
        }
        if offset < selection.start {
            if before.len() == CONTEXT_CHARS {
                before.pop_front();
            }
            before.push_back(ch);
        } else if offset >= selection.end {
            after.push(ch);
            after_count += 1;
            if after_count == CONTEXT_CHARS {
                break;
            }
        }
    }

    (before.iter().collect(), after)
}

/// Nearest structural anchor at or before the selection start, falling
/// back to the document's first anchor. Absence is legal and never blocks
/// capture.
fn locate(body: &str, start: usize) -> Option<String> {
    let all = anchors(body);
    all.iter()
        .rev()
        .find(|a| a.offset <= start)
        .or_else(|| all.first())
        .map(|a| a.id.clone())
}
