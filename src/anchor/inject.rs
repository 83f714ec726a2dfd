//! Marker injector
//!
//! Replaces resolved ranges with highlight-wrapped text. Ranges are
//! sorted by descending start and applied back-to-front, so no computed
//! offset is invalidated by an earlier insertion. A range spanning line
//! breaks is wrapped one segment per line; a marker never crosses a
//! break. The note affordance is appended once, after the final segment.

use std::ops::Range;

/// Markup emitted around resolved ranges.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// CSS class for highlight segments.
    pub highlight_class: String,
    /// CSS class for the trailing note affordance.
    pub note_class: String,
    /// Data attribute carrying the annotation id.
    pub id_attribute: String,
    /// Glyph shown in the note affordance.
    pub note_glyph: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            highlight_class: "gl-highlight".to_string(),
            note_class: "gl-note-marker".to_string(),
            id_attribute: "data-annotation-id".to_string(),
            note_glyph: "✎".to_string(),
        }
    }
}

/// An expanded range ready for injection, tagged with its annotation id.
#[derive(Debug, Clone)]
pub struct Placement {
    pub annotation_id: String,
    pub range: Range<usize>,
}

/// Result of an injection pass.
#[derive(Debug)]
pub struct InjectionOutcome {
    pub body: String,
    /// Placements actually applied.
    pub injected: usize,
    /// Ids of placements dropped for overlapping an applied range or for
    /// carrying an invalid range.
    pub dropped: Vec<String>,
}

/// Apply every placement to `body`, back-to-front.
///
/// Overlapping ranges between annotations are not reconciled: the later
/// range is kept and the earlier overlapping one is dropped, so the
/// output markup always stays well formed.
pub fn inject(body: &str, placements: Vec<Placement>, config: &MarkerConfig) -> InjectionOutcome {
    let mut placements = placements;
    placements.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut out = body.to_string();
    let mut injected = 0;
    let mut dropped = Vec::new();
    let mut applied_start = usize::MAX;

    for placement in placements {
        let range = placement.range;
        if range.start >= range.end
            || range.end > body.len()
            || !body.is_char_boundary(range.start)
            || !body.is_char_boundary(range.end)
        {
            dropped.push(placement.annotation_id);
            continue;
        }
        if range.end > applied_start {
            dropped.push(placement.annotation_id);
            continue;
        }
        let wrapped = wrap_segments(&body[range.clone()], &placement.annotation_id, config);
        out.replace_range(range.clone(), &wrapped);
        applied_start = range.start;
        injected += 1;
    }

    InjectionOutcome {
        body: out,
        injected,
        dropped,
    }
}

/// Wrap `text` for one annotation, one highlight span per line segment,
/// with the note affordance after the last one.
fn wrap_segments(text: &str, annotation_id: &str, config: &MarkerConfig) -> String {
    let mut out = String::with_capacity(text.len() + 128);
    for (index, segment) in text.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }
        if segment.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "<span class=\"{}\" {}=\"{}\">{}</span>",
            config.highlight_class, config.id_attribute, annotation_id, segment
        ));
    }
    out.push_str(&format!(
        "<sup class=\"{}\" {}=\"{}\">{}</sup>",
        config.note_class, config.id_attribute, annotation_id, config.note_glyph
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(id: &str, range: Range<usize>) -> Placement {
        Placement {
            annotation_id: id.to_string(),
            range,
        }
    }

    #[test]
    fn test_single_injection() {
        let body = "La Repubblica è fondata";
        let start = body.find("Repubblica").unwrap();
        let outcome = inject(
            body,
            vec![placement("a1", start..start + 10)],
            &MarkerConfig::default(),
        );

        assert_eq!(outcome.injected, 1);
        assert!(outcome.dropped.is_empty());
        assert_eq!(
            outcome.body,
            "La <span class=\"gl-highlight\" data-annotation-id=\"a1\">Repubblica</span>\
             <sup class=\"gl-note-marker\" data-annotation-id=\"a1\">✎</sup> è fondata"
        );
    }

    #[test]
    fn test_back_to_front_keeps_offsets_valid() {
        let body = "uno due tre quattro";
        let first = body.find("uno").unwrap();
        let second = body.find("tre").unwrap();
        let outcome = inject(
            body,
            vec![
                placement("a1", first..first + 3),
                placement("a2", second..second + 3),
            ],
            &MarkerConfig::default(),
        );

        assert_eq!(outcome.injected, 2);
        assert!(outcome.body.contains(">uno</span>"));
        assert!(outcome.body.contains(">tre</span>"));
        assert!(outcome.body.contains("data-annotation-id=\"a1\""));
        assert!(outcome.body.contains("data-annotation-id=\"a2\""));
        assert!(outcome.body.ends_with(" quattro"));
    }

    #[test]
    fn test_multiline_range_wrapped_per_segment() {
        let body = "prima riga\nseconda riga";
        let start = body.find("riga").unwrap();
        let end = body.find("seconda").unwrap() + "seconda".len();
        let outcome = inject(
            body,
            vec![placement("a1", start..end)],
            &MarkerConfig::default(),
        );

        assert_eq!(outcome.injected, 1);
        // Two separate highlight spans, one untouched break between them.
        assert_eq!(outcome.body.matches("<span class=\"gl-highlight\"").count(), 2);
        assert!(outcome.body.contains(">riga</span>\n<span"));
        assert!(outcome.body.contains(">seconda</span>"));
        // Exactly one note affordance, after the final segment.
        assert_eq!(outcome.body.matches("gl-note-marker").count(), 1);
        for line in outcome.body.split('\n') {
            assert_eq!(
                line.matches("<span").count(),
                line.matches("</span>").count()
            );
        }
    }

    #[test]
    fn test_overlapping_placement_dropped() {
        let body = "abcdefghij";
        let outcome = inject(
            body,
            vec![placement("a1", 2..6), placement("a2", 4..8)],
            &MarkerConfig::default(),
        );

        assert_eq!(outcome.injected, 1);
        assert_eq!(outcome.dropped, vec!["a1".to_string()]);
        assert!(outcome.body.contains(">efgh</span>"));
    }

    #[test]
    fn test_touching_placements_both_applied() {
        let body = "abcdefghij";
        let outcome = inject(
            body,
            vec![placement("a1", 2..4), placement("a2", 4..8)],
            &MarkerConfig::default(),
        );

        assert_eq!(outcome.injected, 2);
        assert!(outcome.dropped.is_empty());
    }

    #[test]
    fn test_invalid_range_dropped() {
        let body = "è breve";
        let outcome = inject(
            body,
            vec![
                placement("a1", 5..3),
                placement("a2", 0..100),
                placement("a3", 1..3),
            ],
            &MarkerConfig::default(),
        );

        assert_eq!(outcome.injected, 0);
        assert_eq!(outcome.dropped.len(), 3);
        assert_eq!(outcome.body, body);
    }

    #[test]
    fn test_no_placements_leaves_body_untouched() {
        let body = "niente da evidenziare";
        let outcome = inject(body, vec![], &MarkerConfig::default());
        assert_eq!(outcome.body, body);
        assert_eq!(outcome.injected, 0);
    }
}
