//! Body sanitization
//!
//! Upstream bodies are rendered into user-facing markup, so script and
//! style elements, event handlers, and javascript: URLs are stripped
//! before anything else touches them. Structural anchors and formatting
//! pass through untouched.

use lol_html::{element, rewrite_str, RewriteStrSettings};

use super::types::CorpusError;

const EVENT_ATTRIBUTES: [&str; 6] = [
    "onclick",
    "onload",
    "onerror",
    "onmouseover",
    "onfocus",
    "oninput",
];

/// Strip active content from a fetched body.
pub fn sanitize_body(body: &str) -> Result<String, CorpusError> {
    rewrite_str(
        body,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("script", |el| {
                    el.remove();
                    Ok(())
                }),
                element!("style", |el| {
                    el.remove();
                    Ok(())
                }),
                element!("*", |el| {
                    for attr in EVENT_ATTRIBUTES {
                        el.remove_attribute(attr);
                    }
                    if let Some(href) = el.get_attribute("href") {
                        if href.trim().to_lowercase().starts_with("javascript:") {
                            el.remove_attribute("href");
                        }
                    }
                    if let Some(src) = el.get_attribute("src") {
                        if src.trim().to_lowercase().starts_with("javascript:") {
                            el.remove_attribute("src");
                        }
                    }
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| CorpusError::Fetch(format!("sanitize failed: {e}")))
}
