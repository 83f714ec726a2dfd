//! Document API endpoints
//!
//! Serves sanitized corpus bodies, re-anchoring and injecting the
//! requesting user's annotations on every fetch. The raw body is never
//! mutated server-side beyond marker injection; a fresh render starts
//! from the cached sanitized original.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::anchor::{render_with_annotations, Fingerprint, MarkerConfig};
use crate::corpus::DocumentKey;
use crate::db::AnnotationRepository;
use crate::error::{AppError, Result};
use crate::outline::{self, OutlineEntry};
use crate::state::AppState;

/// Document body response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
    /// Annotations placed into the body
    pub injected: usize,
    /// Annotation ids that no longer resolve against this version
    pub skipped: Vec<String>,
}

/// Outline response
#[derive(Serialize)]
pub struct OutlineResponse {
    pub id: String,
    pub entries: Vec<OutlineEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentQuery {
    /// Version date (YYYY-MM-DD); absent means the current consolidation
    as_of: Option<String>,
    /// When present, this user's annotations are anchored and injected
    user_id: Option<String>,
}

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_document))
        .route("/:id/outline", get(get_outline))
}

/// Fetch a document version, with the user's annotations injected
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<DocumentResponse>> {
    let as_of = parse_as_of(query.as_of.as_deref())?;
    let document = state.corpus().get(&DocumentKey::new(&id, as_of)).await?;

    let (body, injected, skipped) = match &query.user_id {
        Some(user_id) => {
            let repo = AnnotationRepository::new(state.db());
            let annotations = repo.list_for_document(user_id, &id).await?;
            let fingerprints: Vec<(String, Fingerprint)> = annotations
                .iter()
                .map(|a| (a.id.clone(), a.fingerprint()))
                .collect();

            let outcome =
                render_with_annotations(&document.body, &fingerprints, &MarkerConfig::default());
            if !outcome.skipped.is_empty() {
                tracing::debug!(
                    doc_id = %id,
                    skipped = outcome.skipped.len(),
                    "annotations no longer resolve against this version"
                );
            }
            (outcome.body, outcome.injected, outcome.skipped)
        }
        None => (document.body.clone(), 0, Vec::new()),
    };

    Ok(Json(DocumentResponse {
        id: document.id,
        as_of: as_of.map(|d| d.to_string()),
        title: document.title,
        body,
        injected,
        skipped,
    }))
}

/// Extract the heading outline of a document version
async fn get_outline(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<OutlineResponse>> {
    let as_of = parse_as_of(query.as_of.as_deref())?;
    let document = state.corpus().get(&DocumentKey::new(&id, as_of)).await?;

    Ok(Json(OutlineResponse {
        id: document.id,
        entries: outline::extract(&document.body),
    }))
}

fn parse_as_of(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid asOf date: {}", s))),
    }
}
