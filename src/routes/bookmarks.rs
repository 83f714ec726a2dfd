//! Bookmark API endpoints
//!
//! One bookmark per (user, document); re-bookmarking refreshes the
//! title in place. Category and deletion are keyed by document, the
//! way the reading list presents them.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::{Bookmark, BookmarkRepository, CreateBookmark};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the bookmarks router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookmarks).post(create_bookmark))
        .route("/:doc_id", get(get_bookmark).patch(update_category).delete(delete_bookmark))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

#[derive(Deserialize)]
struct UpdateCategoryRequest {
    category: String,
}

async fn list_bookmarks(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Bookmark>>> {
    Ok(Json(
        BookmarkRepository::new(state.db()).list(&query.user_id).await?,
    ))
}

async fn get_bookmark(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Bookmark>> {
    BookmarkRepository::new(state.db())
        .get_for_document(&query.user_id, &doc_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Bookmark not found: {}", doc_id)))
}

async fn create_bookmark(
    State(state): State<AppState>,
    Json(request): Json<CreateBookmark>,
) -> Result<(StatusCode, Json<Bookmark>)> {
    let bookmark = BookmarkRepository::new(state.db()).create(&request).await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

async fn update_category(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Query(query): Query<UserQuery>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Bookmark>> {
    BookmarkRepository::new(state.db())
        .update_category(&query.user_id, &doc_id, &request.category)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Bookmark not found: {}", doc_id)))
}

async fn delete_bookmark(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode> {
    if BookmarkRepository::new(state.db())
        .delete(&query.user_id, &doc_id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Bookmark not found: {}", doc_id)))
    }
}
