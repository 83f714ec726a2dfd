//! Annotation database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::anchor::Fingerprint;
use crate::error::Result;

/// Annotation record
///
/// The fingerprint fields (selection text, prefix, suffix, location id,
/// offset) are immutable after creation; only the comment is editable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    pub user_id: String,
    pub doc_id: String,
    pub selection_text: String,
    pub location_id: Option<String>,
    pub selection_offset: i64,
    pub prefix: String,
    pub suffix: String,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Annotation {
    /// View the stored record as a resolvable fingerprint
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            selection_text: self.selection_text.clone(),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            location_id: self.location_id.clone(),
        }
    }
}

/// Create annotation request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotation {
    pub user_id: String,
    pub doc_id: String,
    pub selection_text: String,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub selection_offset: i64,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub comment: String,
}

/// Update annotation request (comment only)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAnnotation {
    pub comment: String,
}

/// Annotation repository
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific annotation
    pub async fn get(&self, id: &str) -> Result<Option<Annotation>> {
        let annotation = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, user_id, doc_id, selection_text, location_id, selection_offset,
                   prefix, suffix, comment, created_at, updated_at
            FROM annotations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(annotation)
    }

    /// List a user's annotations for one document, oldest first
    pub async fn list_for_document(
        &self,
        user_id: &str,
        doc_id: &str,
    ) -> Result<Vec<Annotation>> {
        let annotations = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, user_id, doc_id, selection_text, location_id, selection_offset,
                   prefix, suffix, comment, created_at, updated_at
            FROM annotations
            WHERE user_id = ? AND doc_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(doc_id)
        .fetch_all(self.pool)
        .await?;

        Ok(annotations)
    }

    /// List all annotations for a user
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Annotation>> {
        let annotations = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, user_id, doc_id, selection_text, location_id, selection_offset,
                   prefix, suffix, comment, created_at, updated_at
            FROM annotations
            WHERE user_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(annotations)
    }

    /// Create a new annotation
    pub async fn create(&self, data: &CreateAnnotation) -> Result<Annotation> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO annotations (id, user_id, doc_id, selection_text, location_id,
                                     selection_offset, prefix, suffix, comment,
                                     created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.user_id)
        .bind(&data.doc_id)
        .bind(&data.selection_text)
        .bind(&data.location_id)
        .bind(data.selection_offset)
        .bind(&data.prefix)
        .bind(&data.suffix)
        .bind(&data.comment)
        .bind(&now)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(&id).await?.ok_or_else(|| {
            crate::error::AppError::Internal("Failed to fetch created annotation".to_string())
        })
    }

    /// Replace an annotation's comment
    pub async fn update_comment(&self, id: &str, comment: &str) -> Result<Option<Annotation>> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE annotations SET comment = ?, updated_at = ? WHERE id = ?")
            .bind(comment)
            .bind(&now)
            .bind(id)
            .execute(self.pool)
            .await?;

        self.get(id).await
    }

    /// Delete an annotation
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn sample(doc_id: &str, text: &str) -> CreateAnnotation {
        CreateAnnotation {
            user_id: "u1".to_string(),
            doc_id: doc_id.to_string(),
            selection_text: text.to_string(),
            location_id: Some("art1".to_string()),
            selection_offset: 42,
            prefix: "la ".to_string(),
            suffix: " fondata".to_string(),
            comment: "nota".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;
        let repo = AnnotationRepository::new(&pool);

        let created = repo.create(&sample("doc-1", "Repubblica")).await.unwrap();
        assert_eq!(created.selection_text, "Repubblica");
        assert_eq!(created.selection_offset, 42);

        let fetched = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.prefix, "la ");
    }

    #[tokio::test]
    async fn test_list_scoped_to_user_and_document() {
        let pool = test_pool().await;
        let repo = AnnotationRepository::new(&pool);

        repo.create(&sample("doc-1", "prima")).await.unwrap();
        repo.create(&sample("doc-1", "seconda")).await.unwrap();
        repo.create(&sample("doc-2", "altra")).await.unwrap();

        let mut other_user = sample("doc-1", "estranea");
        other_user.user_id = "u2".to_string();
        repo.create(&other_user).await.unwrap();

        let listed = repo.list_for_document("u1", "doc-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].selection_text, "prima");

        let all = repo.list_for_user("u1").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_touches_comment_only() {
        let pool = test_pool().await;
        let repo = AnnotationRepository::new(&pool);

        let created = repo.create(&sample("doc-1", "Repubblica")).await.unwrap();
        let updated = repo
            .update_comment(&created.id, "nota rivista")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.comment, "nota rivista");
        assert_eq!(updated.selection_text, created.selection_text);
        assert_eq!(updated.prefix, created.prefix);
        assert_eq!(updated.suffix, created.suffix);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let repo = AnnotationRepository::new(&pool);

        let created = repo.create(&sample("doc-1", "Repubblica")).await.unwrap();
        assert!(repo.delete(&created.id).await.unwrap());
        assert!(!repo.delete(&created.id).await.unwrap());
        assert!(repo.get(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fingerprint_view() {
        let pool = test_pool().await;
        let repo = AnnotationRepository::new(&pool);

        let created = repo.create(&sample("doc-1", "Repubblica")).await.unwrap();
        let fingerprint = created.fingerprint();
        assert_eq!(fingerprint.selection_text, "Repubblica");
        assert_eq!(fingerprint.location_id.as_deref(), Some("art1"));
    }
}
