//! Bookmark database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;

/// Bookmark record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub doc_id: String,
    pub title: String,
    pub date: String,
    pub category: String,
    pub created_at: String,
}

/// Create bookmark request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmark {
    pub user_id: String,
    pub doc_id: String,
    pub title: String,
    #[serde(default)]
    pub date: String,
}

/// Bookmark repository
pub struct BookmarkRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BookmarkRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the bookmark for one document
    pub async fn get_for_document(
        &self,
        user_id: &str,
        doc_id: &str,
    ) -> Result<Option<Bookmark>> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, doc_id, title, date, category, created_at
            FROM bookmarks
            WHERE user_id = ? AND doc_id = ?
            "#,
        )
        .bind(user_id)
        .bind(doc_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(bookmark)
    }

    /// List a user's bookmarks, newest first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Bookmark>> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, doc_id, title, date, category, created_at
            FROM bookmarks
            WHERE user_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(bookmarks)
    }

    /// Create a bookmark, or refresh the existing one for the same
    /// document. One bookmark per (user, doc); re-bookmarking bumps it
    /// back to the top of the list.
    pub async fn create(&self, data: &CreateBookmark) -> Result<Bookmark> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO bookmarks (id, user_id, doc_id, title, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, doc_id)
            DO UPDATE SET title = excluded.title, date = excluded.date,
                          created_at = excluded.created_at
            "#,
        )
        .bind(&id)
        .bind(&data.user_id)
        .bind(&data.doc_id)
        .bind(&data.title)
        .bind(&data.date)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get_for_document(&data.user_id, &data.doc_id)
            .await?
            .ok_or_else(|| {
                crate::error::AppError::Internal("Failed to fetch created bookmark".to_string())
            })
    }

    /// Change a bookmark's category
    pub async fn update_category(
        &self,
        user_id: &str,
        doc_id: &str,
        category: &str,
    ) -> Result<Option<Bookmark>> {
        sqlx::query("UPDATE bookmarks SET category = ? WHERE user_id = ? AND doc_id = ?")
            .bind(category)
            .bind(user_id)
            .bind(doc_id)
            .execute(self.pool)
            .await?;

        self.get_for_document(user_id, doc_id).await
    }

    /// Delete the bookmark for a document
    pub async fn delete(&self, user_id: &str, doc_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND doc_id = ?")
            .bind(user_id)
            .bind(doc_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn sample(doc_id: &str, title: &str) -> CreateBookmark {
        CreateBookmark {
            user_id: "u1".to_string(),
            doc_id: doc_id.to_string(),
            title: title.to_string(),
            date: "2024-01-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_category() {
        let pool = test_pool().await;
        let repo = BookmarkRepository::new(&pool);

        let bookmark = repo.create(&sample("doc-1", "Costituzione")).await.unwrap();
        assert_eq!(bookmark.category, "General");
        assert_eq!(bookmark.date, "2024-01-01");
    }

    #[tokio::test]
    async fn test_rebookmark_updates_in_place() {
        let pool = test_pool().await;
        let repo = BookmarkRepository::new(&pool);

        let first = repo.create(&sample("doc-1", "Costituzione")).await.unwrap();
        repo.update_category("u1", "doc-1", "Studio").await.unwrap();

        let second = repo
            .create(&sample("doc-1", "Costituzione (agg.)"))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.title, "Costituzione (agg.)");
        // Category survives the refresh
        assert_eq!(second.category, "Studio");
        assert_eq!(repo.list("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_by_document() {
        let pool = test_pool().await;
        let repo = BookmarkRepository::new(&pool);

        repo.create(&sample("doc-1", "Costituzione")).await.unwrap();
        assert!(repo.delete("u1", "doc-1").await.unwrap());
        assert!(!repo.delete("u1", "doc-1").await.unwrap());
    }
}
