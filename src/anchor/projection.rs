//! Structural text scanner
//!
//! Projects a formatted body into a clean, matchable shadow: lowercase
//! letters and numbers only, with a map from each clean character back to
//! its byte offset in the raw markup. Tag contents, punctuation, and
//! whitespace are dropped from the clean text but left untouched in the
//! raw stream, so matching is immune to formatting noise while an exact
//! back-mapping is preserved.

use std::ops::Range;

/// Clean shadow of a formatted body plus the map back to raw byte offsets.
///
/// Built fresh for every render and discarded afterwards, never mutated.
/// `clean_to_raw` has the same length as the clean text and is strictly
/// increasing: every clean character maps to exactly one raw position.
#[derive(Debug)]
pub struct CleanProjection<'a> {
    body: &'a str,
    clean: Vec<char>,
    clean_to_raw: Vec<usize>,
}

impl<'a> CleanProjection<'a> {
    /// Scan `body`, tracking an inside-tag flag toggled by `<` and `>`.
    ///
    /// Outside a tag, letters and numbers are lowercased and kept with
    /// their source offset; everything else is dropped. An unterminated
    /// tag leaves the flag set, so the rest of the document is suppressed
    /// from matching rather than mapped incorrectly.
    pub fn build(body: &'a str) -> Self {
        let mut clean = Vec::new();
        let mut clean_to_raw = Vec::new();
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
            if ch.is_alphanumeric() {
                // A multi-char lowercase expansion keeps only its leading
                // char so the map stays one-to-one and strictly increasing.
                let lowered = ch.to_lowercase().next().unwrap_or(ch);
                clean.push(lowered);
                clean_to_raw.push(offset);
            }
        }

        Self {
            body,
            clean,
            clean_to_raw,
        }
    }

    /// The raw body this projection was built from.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// The clean text as a char slice.
    pub fn clean(&self) -> &[char] {
        &self.clean
    }

    pub fn len(&self) -> usize {
        self.clean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clean.is_empty()
    }

    /// Raw byte offset of the clean character at `clean_index`.
    pub fn raw_start(&self, clean_index: usize) -> Option<usize> {
        self.clean_to_raw.get(clean_index).copied()
    }

    /// Map a non-empty clean range to its raw byte range.
    ///
    /// The exclusive end is the start of the last mapped character plus
    /// its UTF-8 length.
    pub fn raw_span(&self, clean_range: Range<usize>) -> Option<Range<usize>> {
        if clean_range.start >= clean_range.end || clean_range.end > self.clean_to_raw.len() {
            return None;
        }
        let start = self.clean_to_raw[clean_range.start];
        let last = self.clean_to_raw[clean_range.end - 1];
        let last_char = self.body[last..].chars().next()?;
        Some(start..last + last_char.len_utf8())
    }
}

/// Apply the scan rule to a bare string, with no index map.
///
/// Used to normalize fingerprint fields before matching: the same
/// lowercasing and the same tag, punctuation, and whitespace suppression
/// as [`CleanProjection::build`].
pub fn normalize(text: &str) -> Vec<char> {
    let mut out = Vec::new();
    let mut in_tag = false;

    for ch in text.chars() {
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
        if ch.is_alphanumeric() {
            out.push(ch.to_lowercase().next().unwrap_or(ch));
        }
    }

    out
}

/// A structural anchor: an identifier embedded in the body marking a
/// navigable location, such as an article or section start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralAnchor {
    /// Byte offset of the anchor tag's opening `<`.
    pub offset: usize,
    pub id: String,
}

/// Collect embedded `id` attributes in document order.
pub fn anchors(body: &str) -> Vec<StructuralAnchor> {
    let mut found = Vec::new();
    let mut base = 0;
    let mut rest = body;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        if let Some(id) = tag_id(tag) {
            found.push(StructuralAnchor {
                offset: base + open,
                id,
            });
        }
        let next = open + close + 1;
        base += next;
        rest = &rest[next..];
    }

    found
}

fn tag_id(tag: &str) -> Option<String> {
    if tag.starts_with('/') {
        return None;
    }
    for token in tag.split_whitespace().skip(1) {
        if let Some(value) = token.strip_prefix("id=") {
            let value = value
                .trim_end_matches('/')
                .trim_matches(|c| c == '"' || c == '\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
