//! Document outline
//!
//! Table-of-contents extraction over a formatted body: heading lines
//! become ordered `{level, text, anchorId}` entries, each tied to the
//! structural anchor that precedes it. The viewing surface reports which
//! anchor is visible; `section_for_anchor` turns that back into an
//! outline position.

use serde::{Deserialize, Serialize};

use crate::anchor::{anchors, StructuralAnchor};

/// One heading in the document outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    /// Heading depth, 1 for the document title.
    pub level: u8,
    pub text: String,
    /// Id of the structural anchor this heading sits under, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
}

/// Extract the ordered outline of `body`.
///
/// A heading is a line starting with a run of `#`. The heading text is
/// stripped of embedded tags and entity-decoded; the anchor id comes from
/// the nearest anchor at or before the heading line.
pub fn extract(body: &str) -> Vec<OutlineEntry> {
    let anchor_list = anchors(body);
    let mut entries = Vec::new();
    let mut offset = 0;

    for line in body.split('\n') {
        let trimmed = line.trim_start();
        let level = trimmed.chars().take_while(|&c| c == '#').count();
        if level > 0 && level <= 6 {
            let rest = trimmed[level..].trim();
            if !rest.is_empty() {
                entries.push(OutlineEntry {
                    level: level as u8,
                    text: heading_text(rest),
                    anchor_id: nearest_anchor(&anchor_list, offset + line.len()),
                });
            }
        }
        offset += line.len() + 1;
    }

    entries
}

/// Index of the outline entry for a visible anchor, used for
/// active-section notifications.
pub fn section_for_anchor(entries: &[OutlineEntry], anchor_id: &str) -> Option<usize> {
    entries
        .iter()
        .position(|e| e.anchor_id.as_deref() == Some(anchor_id))
}

fn nearest_anchor(anchor_list: &[StructuralAnchor], line_end: usize) -> Option<String> {
    anchor_list
        .iter()
        .rev()
        .find(|a| a.offset <= line_end)
        .map(|a| a.id.clone())
}

/// Visible heading text: tags out, entities decoded, emphasis markers
/// trimmed from the edges.
fn heading_text(raw: &str) -> String {
    let mut visible = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
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
        visible.push(ch);
    }
    let decoded = html_escape::decode_html_entities(&visible);
    decoded.trim().trim_matches('*').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "<span id=\"preamble\"></span>\n\n\
        # Costituzione della Repubblica\n\n\
        <span id=\"art1\"></span>\n\n\
        ### Art. 1 - Principi fondamentali\n\n\
        La Repubblica riconosce.\n\n\
        <span id=\"art2\"></span>\n\n\
        ### Art. 2\n\n\
        Testo.\n";

    #[test]
    fn test_extract_levels_and_text() {
        let outline = extract(BODY);
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0].level, 1);
        assert_eq!(outline[0].text, "Costituzione della Repubblica");
        assert_eq!(outline[1].level, 3);
        assert_eq!(outline[1].text, "Art. 1 - Principi fondamentali");
        assert_eq!(outline[2].text, "Art. 2");
    }

    #[test]
    fn test_extract_ties_headings_to_preceding_anchors() {
        let outline = extract(BODY);
        assert_eq!(outline[0].anchor_id, Some("preamble".to_string()));
        assert_eq!(outline[1].anchor_id, Some("art1".to_string()));
        assert_eq!(outline[2].anchor_id, Some("art2".to_string()));
    }

    #[test]
    fn test_heading_without_anchor() {
        let outline = extract("## Solo titolo\n\ntesto");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].anchor_id, None);
    }

    #[test]
    fn test_plain_text_lines_ignored() {
        let outline = extract("testo normale\nniente # titoli qui\n");
        assert!(outline.is_empty());
    }

    #[test]
    fn test_heading_text_strips_tags_and_entities() {
        let outline = extract("### Art. 3 <span id=\"x\"></span> Diritti &amp; doveri\n");
        assert_eq!(outline[0].text, "Art. 3  Diritti & doveri");
        assert_eq!(outline[0].anchor_id, Some("x".to_string()));
    }

    #[test]
    fn test_empty_heading_line_skipped() {
        let outline = extract("###\n### Vero titolo\n");
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].text, "Vero titolo");
    }

    #[test]
    fn test_section_for_anchor() {
        let outline = extract(BODY);
        assert_eq!(section_for_anchor(&outline, "art1"), Some(1));
        assert_eq!(section_for_anchor(&outline, "art2"), Some(2));
        assert_eq!(section_for_anchor(&outline, "sconosciuto"), None);
    }
}
