//! User profile database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;

/// User record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub color: String,
    pub theme: String,
    pub ui_language: String,
    pub mode: String,
    /// Opaque UI state blob (JSON), round-tripped for the client
    pub ui_state: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Create user request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub color: Option<String>,
}

/// Update user request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    pub color: Option<String>,
    pub theme: Option<String>,
    pub ui_language: Option<String>,
    pub mode: Option<String>,
    pub ui_state: Option<String>,
}

/// User repository
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific user
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, color, theme, ui_language, mode, ui_state,
                   created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// List all users, oldest first
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, color, theme, ui_language, mode, ui_state,
                   created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Create a new user
    pub async fn create(&self, data: &CreateUser) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let color = data.color.as_deref().unwrap_or("#3b82f6");

        sqlx::query(
            r#"
            INSERT INTO users (id, name, color, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.name)
        .bind(color)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(&id).await?.ok_or_else(|| {
            crate::error::AppError::Internal("Failed to fetch created user".to_string())
        })
    }

    /// Update a user's profile and UI context
    pub async fn update(&self, id: &str, data: &UpdateUser) -> Result<Option<User>> {
        let now = Utc::now().to_rfc3339();

        // Build dynamic update query
        let mut set_clauses = vec!["updated_at = ?".to_string()];
        let mut binds: Vec<String> = vec![now.clone()];

        if let Some(ref name) = data.name {
            set_clauses.push("name = ?".to_string());
            binds.push(name.clone());
        }

        if let Some(ref color) = data.color {
            set_clauses.push("color = ?".to_string());
            binds.push(color.clone());
        }

        if let Some(ref theme) = data.theme {
            set_clauses.push("theme = ?".to_string());
            binds.push(theme.clone());
        }

        if let Some(ref ui_language) = data.ui_language {
            set_clauses.push("ui_language = ?".to_string());
            binds.push(ui_language.clone());
        }

        if let Some(ref mode) = data.mode {
            set_clauses.push("mode = ?".to_string());
            binds.push(mode.clone());
        }

        if let Some(ref ui_state) = data.ui_state {
            set_clauses.push("ui_state = ?".to_string());
            binds.push(ui_state.clone());
        }

        let query = format!("UPDATE users SET {} WHERE id = ?", set_clauses.join(", "));

        let mut sql_query = sqlx::query(&query);
        for bind in binds {
            sql_query = sql_query.bind(bind);
        }
        sql_query = sql_query.bind(id);

        sql_query.execute(self.pool).await?;

        self.get(id).await
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
