//! Annotation API endpoints
//!
//! CRUD over stored fingerprints and comments. The fingerprint fields
//! are write-once: updates replace the comment only, deletes are by id.
//! Anchoring never happens here — the stored record is resolved against
//! a body at document-fetch time.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;

use crate::db::{Annotation, AnnotationRepository, CreateAnnotation, UpdateAnnotation};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the annotations router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_annotations).post(create_annotation))
        .route(
            "/:id",
            patch(update_annotation).get(get_annotation).delete(delete_annotation),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    user_id: String,
    doc_id: Option<String>,
}

/// List a user's annotations, for one document or across the corpus
async fn list_annotations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Annotation>>> {
    let repo = AnnotationRepository::new(state.db());
    let annotations = match &query.doc_id {
        Some(doc_id) => repo.list_for_document(&query.user_id, doc_id).await?,
        None => repo.list_for_user(&query.user_id).await?,
    };
    Ok(Json(annotations))
}

async fn get_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Annotation>> {
    AnnotationRepository::new(state.db())
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Annotation not found: {}", id)))
}

/// Store a captured fingerprint with its comment
async fn create_annotation(
    State(state): State<AppState>,
    Json(request): Json<CreateAnnotation>,
) -> Result<(StatusCode, Json<Annotation>)> {
    // Capture-side empty selections never reach the store; a direct
    // API call with one is a client bug.
    if request.selection_text.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Selection text must not be empty".to_string(),
        ));
    }

    let annotation = AnnotationRepository::new(state.db()).create(&request).await?;
    tracing::info!(
        annotation_id = %annotation.id,
        doc_id = %annotation.doc_id,
        "annotation created"
    );
    Ok((StatusCode::CREATED, Json(annotation)))
}

/// Replace the comment; the fingerprint is immutable post-creation
async fn update_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAnnotation>,
) -> Result<Json<Annotation>> {
    AnnotationRepository::new(state.db())
        .update_comment(&id, &request.comment)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Annotation not found: {}", id)))
}

async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if AnnotationRepository::new(state.db()).delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Annotation not found: {}", id)))
    }
}
