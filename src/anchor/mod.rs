//! Annotation anchoring engine
//!
//! The pure core of the reader. A completed selection is captured as a
//! position-independent [`Fingerprint`]; on every render the full
//! annotation set for a document is relocated into the current body and
//! wrapped in visual markers. The pipeline is resolve → expand → inject,
//! run once per completed render, never incrementally.
//!
//! [`render_with_annotations`] is a pure function of its inputs: no I/O,
//! no shared state, safe to re-run on every render without coordination.
//! No anchoring failure is fatal; the worst case is the input body
//! returned unchanged with every annotation reported as skipped.

pub mod expand;
pub mod fingerprint;
pub mod inject;
pub mod projection;
pub mod resolver;

pub use expand::expand;
pub use fingerprint::{capture, CapturedSelection, Fingerprint, CONTEXT_CHARS};
pub use inject::{inject, InjectionOutcome, MarkerConfig, Placement};
pub use projection::{anchors, normalize, CleanProjection, StructuralAnchor};
pub use resolver::{resolve, ResolvedAnchor};

/// Output of a full render pass.
#[derive(Debug)]
pub struct RenderOutcome {
    /// The body actually shown, markers included.
    pub body: String,
    /// Number of annotations injected.
    pub injected: usize,
    /// Ids of annotations that could not be placed: stale fingerprints
    /// and ranges dropped for overlapping an applied one.
    pub skipped: Vec<String>,
}

/// Resolve, expand, and inject every annotation into `body`.
///
/// Annotations whose selection text no longer occurs in the body are
/// skipped silently and reported, never raised as errors.
pub fn render_with_annotations(
    body: &str,
    annotations: &[(String, Fingerprint)],
    config: &MarkerConfig,
) -> RenderOutcome {
    let projection = CleanProjection::build(body);
    let mut placements = Vec::with_capacity(annotations.len());
    let mut skipped = Vec::new();

    for (id, fingerprint) in annotations {
        match resolver::resolve(fingerprint, &projection) {
            Some(found) => {
                let range = expand::expand(body, found.raw, &fingerprint.selection_text);
                placements.push(Placement {
                    annotation_id: id.clone(),
                    range,
                });
            }
            None => skipped.push(id.clone()),
        }
    }

    let outcome = inject::inject(body, placements, config);
    skipped.extend(outcome.dropped);

    RenderOutcome {
        body: outcome.body,
        injected: outcome.injected,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(id: &str, selection: &str, prefix: &str, suffix: &str) -> (String, Fingerprint) {
        (
            id.to_string(),
            Fingerprint {
                selection_text: selection.to_string(),
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
                location_id: None,
            },
        )
    }

    fn clean_of(text: &str) -> String {
        normalize(text).into_iter().collect()
    }

    #[test]
    fn test_worked_example_end_to_end() {
        let body = "Art. 1. The **Republic** is founded on labor.";
        let set = vec![annotation("a1", "Republic", "art 1 the", "is founded on labor")];

        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());

        assert_eq!(outcome.injected, 1);
        assert!(outcome.skipped.is_empty());
        assert!(outcome.body.contains(
            "<span class=\"gl-highlight\" data-annotation-id=\"a1\">**Republic**</span>"
        ));
        assert!(outcome.body.contains("<sup class=\"gl-note-marker\""));
        assert!(outcome.body.starts_with("Art. 1. The "));
        assert!(outcome.body.ends_with(" is founded on labor."));
    }

    #[test]
    fn test_injected_content_preserves_selection_text() {
        let body = "Art. 3. Tutti i cittadini hanno pari dignità sociale.\n\
                    Art. 4. La Repubblica riconosce a tutti i cittadini il diritto al lavoro.";
        let set = vec![
            annotation("a1", "pari dignità", "cittadini hanno", "sociale"),
            annotation("a2", "diritto al lavoro", "cittadini il", ""),
        ];

        let projection = CleanProjection::build(body);
        for (_, fingerprint) in &set {
            let resolved = resolve(fingerprint, &projection).unwrap();
            let expanded = expand(body, resolved.raw, &fingerprint.selection_text);
            assert_eq!(
                clean_of(&body[expanded]),
                clean_of(&fingerprint.selection_text)
            );
        }

        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());
        assert_eq!(outcome.injected, 2);
    }

    #[test]
    fn test_idempotent_reanchoring_on_injected_body() {
        let body = "Art. 1. La **Repubblica** è fondata sul lavoro.";
        let set = vec![annotation("a1", "Repubblica", "art 1 la", "è fondata sul lavoro")];
        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());
        assert_eq!(outcome.injected, 1);

        // Re-derive a fingerprint from the injected body for the same
        // unmoved selection, then resolve it there again.
        let rendered = &outcome.body;
        let start = rendered.find("Repubblica").unwrap();
        let recaptured = capture(rendered, start..start + "Repubblica".len()).unwrap();

        let projection = CleanProjection::build(rendered);
        let resolved = resolve(&recaptured.fingerprint, &projection).unwrap();
        assert_eq!(&rendered[resolved.raw.clone()], "Repubblica");
        assert_eq!(clean_of(&rendered[resolved.raw]), "repubblica");
    }

    #[test]
    fn test_multiline_selection_never_crosses_breaks() {
        let body = "comma uno resta\ncomma due cambia";
        let selection = "resta\ncomma due";
        let set = vec![annotation("a1", selection, "comma uno", "cambia")];

        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());

        assert_eq!(outcome.injected, 1);
        for line in outcome.body.split('\n') {
            assert_eq!(
                line.matches("<span").count(),
                line.matches("</span>").count(),
                "marker crosses a line break in {line:?}"
            );
        }
        assert!(outcome.body.contains(">resta</span>\n<span"));
    }

    #[test]
    fn test_ambiguous_selection_follows_context() {
        let body = "il giudice decide. il collegio valuta, poi il giudice decide.";
        let set = vec![annotation("a1", "il giudice decide", "poi", "")];

        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());

        assert_eq!(outcome.injected, 1);
        let marked = outcome.body.find("<span").unwrap();
        let second = body.rfind("il giudice").unwrap();
        assert_eq!(marked, second);
    }

    #[test]
    fn test_stale_annotation_skipped_silently() {
        let body = "il testo vigente oggi";
        let set = vec![
            annotation("vivo", "testo vigente", "il", "oggi"),
            annotation("morto", "testo abrogato", "", ""),
        ];

        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());

        assert_eq!(outcome.injected, 1);
        assert_eq!(outcome.skipped, vec!["morto".to_string()]);
        assert!(!outcome.body.contains("morto"));
    }

    #[test]
    fn test_empty_annotation_set_returns_body_unchanged() {
        let body = "nessuna annotazione qui";
        let outcome = render_with_annotations(body, &[], &MarkerConfig::default());
        assert_eq!(outcome.body, body);
        assert_eq!(outcome.injected, 0);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_all_stale_returns_body_unchanged() {
        let body = "corpo attuale";
        let set = vec![
            annotation("a1", "frase sparita", "", ""),
            annotation("a2", "altra frase sparita", "", ""),
        ];
        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());
        assert_eq!(outcome.body, body);
        assert_eq!(outcome.skipped.len(), 2);
    }

    #[test]
    fn test_capture_then_render_round_trip() {
        let body = "Art. 2. La Repubblica riconosce e garantisce i diritti inviolabili.";
        let start = body.find("garantisce").unwrap();
        let captured = capture(body, start..start + "garantisce".len()).unwrap();

        let set = vec![("r1".to_string(), captured.fingerprint)];
        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());

        assert_eq!(outcome.injected, 1);
        assert!(outcome.body.contains(">garantisce</span>"));
    }

    #[test]
    fn test_overlap_between_annotations_not_reconciled() {
        let body = "la corte costituzionale giudica";
        let set = vec![
            annotation("a1", "corte costituzionale", "la", ""),
            annotation("a2", "costituzionale giudica", "corte", ""),
        ];

        let outcome = render_with_annotations(body, &set, &MarkerConfig::default());

        assert_eq!(outcome.injected, 1);
        assert_eq!(outcome.skipped.len(), 1);
    }
}
