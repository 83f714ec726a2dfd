//! User profile API endpoints
//!
//! Profiles carry the reader context (theme, language, mode) and an
//! opaque UI state blob persisted on every change.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::{CreateUser, UpdateUser, User, UserRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the users router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(UserRepository::new(state.db()).list().await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    UserRepository::new(state.db())
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User not found: {}", id)))
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("User name must not be empty".to_string()));
    }

    let user = UserRepository::new(state.db()).create(&request).await?;
    tracing::info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Partial update; absent fields keep their stored value
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUser>,
) -> Result<Json<User>> {
    UserRepository::new(state.db())
        .update(&id, &request)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User not found: {}", id)))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if UserRepository::new(state.db()).delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("User not found: {}", id)))
    }
}
