//! Boundary expander
//!
//! Widens a resolved raw range to absorb the markup immediately around
//! it: whole adjacent tags and runs of punctuation. Expansion stops at
//! letters, numbers, and whitespace, and a line break halts it outright,
//! even in the middle of a tag. Afterwards the selection's own dropped
//! edge punctuation is restored where the raw text still carries it.

use std::ops::Range;

/// Expand `range` outward over adjacent markup.
///
/// `selection_text` is the originally captured selection; its leading and
/// trailing non-alphanumeric runs, lost to clean normalization, are
/// re-absorbed when the surrounding raw text still matches them. A range
/// that is out of bounds or off a character boundary comes back unchanged.
pub fn expand(body: &str, range: Range<usize>, selection_text: &str) -> Range<usize> {
    if range.start > range.end
        || range.end > body.len()
        || !body.is_char_boundary(range.start)
        || !body.is_char_boundary(range.end)
    {
        return range;
    }

    let mut start = range.start;
    let mut end = range.end;

    loop {
        let Some((pos, ch)) = prev_char(body, start) else {
            break;
        };
        if ch == '\n' || ch.is_alphanumeric() || ch.is_whitespace() || ch == '<' {
            break;
        }
        if ch == '>' {
            // Absorb the whole tag or nothing at all.
            match opening_delimiter(body, pos) {
                Some(open) => start = open,
                None => break,
            }
            continue;
        }
        start = pos;
    }

    loop {
        let Some(ch) = body[end..].chars().next() else {
            break;
        };
        if ch == '\n' || ch.is_alphanumeric() || ch.is_whitespace() || ch == '>' {
            break;
        }
        if ch == '<' {
            match closing_delimiter(body, end) {
                Some(after) => end = after,
                None => break,
            }
            continue;
        }
        end += ch.len_utf8();
    }

    let lead = leading_run(selection_text);
    if !lead.is_empty()
        && lead.len() < selection_text.len()
        && !lead.contains('\n')
        && body[..start].ends_with(lead)
    {
        start -= lead.len();
    }

    let trail = trailing_run(selection_text);
    if !trail.is_empty()
        && trail.len() < selection_text.len()
        && !trail.contains('\n')
        && body[end..].starts_with(trail)
    {
        end += trail.len();
    }

    start..end
}

fn prev_char(body: &str, pos: usize) -> Option<(usize, char)> {
    let ch = body[..pos].chars().next_back()?;
    Some((pos - ch.len_utf8(), ch))
}

/// Offset of the `<` matching the `>` at `close`, scanning backwards.
/// A line break before the `<` means the tag is not absorbable.
fn opening_delimiter(body: &str, close: usize) -> Option<usize> {
    let mut pos = close;
    while let Some((prev, ch)) = prev_char(body, pos) {
        match ch {
            '\n' => return None,
            '<' => return Some(prev),
            _ => pos = prev,
        }
    }
    None
}

/// Offset just past the `>` matching the `<` at `open`, scanning forward.
fn closing_delimiter(body: &str, open: usize) -> Option<usize> {
    for (rel, ch) in body[open..].char_indices().skip(1) {
        match ch {
            '\n' => return None,
            '>' => return Some(open + rel + 1),
            _ => {}
        }
    }
    None
}

fn leading_run(text: &str) -> &str {
    let kept = text.trim_start_matches(|c: char| !c.is_alphanumeric());
    &text[..text.len() - kept.len()]
}

fn trailing_run(text: &str) -> &str {
    let kept = text.trim_end_matches(|c: char| !c.is_alphanumeric());
    &text[kept.len()..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_of(body: &str, text: &str) -> Range<usize> {
        let start = body.find(text).unwrap();
        start..start + text.len()
    }

    #[test]
    fn test_absorbs_emphasis_markers() {
        let body = "Art. 1. The **Republic** is founded on labor.";
        let expanded = expand(body, range_of(body, "Republic"), "Republic");
        assert_eq!(&body[expanded], "**Republic**");
    }

    #[test]
    fn test_absorbs_whole_adjacent_tags() {
        let body = "The <b>Republic</b> is founded";
        let expanded = expand(body, range_of(body, "Republic"), "Republic");
        assert_eq!(&body[expanded], "<b>Republic</b>");
    }

    #[test]
    fn test_absorbs_nested_markup_outward() {
        let body = r#"qui <em>**Repubblica**</em> là"#;
        let expanded = expand(body, range_of(body, "Repubblica"), "Repubblica");
        assert_eq!(&body[expanded], "<em>**Repubblica**</em>");
    }

    #[test]
    fn test_stops_at_whitespace() {
        let body = "La Repubblica è fondata";
        let range = range_of(body, "Repubblica");
        assert_eq!(expand(body, range.clone(), "Repubblica"), range);
    }

    #[test]
    fn test_stops_at_alphanumeric_content() {
        let body = "pre2**Repubblica**3post";
        let expanded = expand(body, range_of(body, "Repubblica"), "Repubblica");
        assert_eq!(&body[expanded], "**Repubblica**");
    }

    #[test]
    fn test_line_break_halts_expansion() {
        let body = "prima**\n**Repubblica**\n**dopo";
        let expanded = expand(body, range_of(body, "Repubblica"), "Repubblica");
        assert_eq!(&body[expanded], "**Repubblica**");
    }

    #[test]
    fn test_line_break_inside_tag_halts_without_absorbing() {
        let body = "<i\nrotto>Repubblica";
        let range = range_of(body, "Repubblica");
        assert_eq!(expand(body, range.clone(), "Repubblica"), range);
    }

    #[test]
    fn test_unterminated_tag_not_absorbed() {
        let body = "Repubblica<span id=rotto";
        let range = range_of(body, "Repubblica");
        assert_eq!(expand(body, range.clone(), "Repubblica"), range);
    }

    #[test]
    fn test_restores_selection_edge_punctuation_across_space() {
        let body = "testo « Repubblica » altro";
        let expanded = expand(body, range_of(body, "Repubblica"), "« Repubblica »");
        assert_eq!(&body[expanded], "« Repubblica »");
    }

    #[test]
    fn test_adjacent_edge_punctuation_absorbed_once() {
        let body = "vedi (Repubblica) qui";
        let expanded = expand(body, range_of(body, "Repubblica"), "(Repubblica)");
        assert_eq!(&body[expanded], "(Repubblica)");
    }

    #[test]
    fn test_no_restore_when_raw_text_changed() {
        let body = "testo [Repubblica] altro";
        let expanded = expand(body, range_of(body, "Repubblica"), "« Repubblica »");
        assert_eq!(&body[expanded], "[Repubblica]");
    }

    #[test]
    fn test_document_edges() {
        let body = "**Repubblica**";
        let expanded = expand(body, range_of(body, "Repubblica"), "Repubblica");
        assert_eq!(&body[expanded], "**Repubblica**");
    }

    #[test]
    fn test_degenerate_range_returned_unchanged() {
        let body = "è qui";
        assert_eq!(expand(body, 1..4, "x"), 1..4);
        assert_eq!(expand(body, 2..90, "x"), 2..90);
    }
}
