//! Database module for SQLite persistence
//!
//! Handles annotation, user profile, and bookmark storage.

mod annotations;
mod bookmarks;
mod schema;
mod users;

pub use annotations::*;
pub use bookmarks::*;
pub use schema::*;
pub use users::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::Result;

/// Create a new database connection pool
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run migrations
    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Seed a default user so the reader is usable before any profile exists
pub async fn ensure_default_user(pool: &SqlitePool) -> Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if count == 0 {
        let repo = UserRepository::new(pool);
        let user = repo
            .create(&CreateUser {
                name: "Default User".to_string(),
                color: None,
            })
            .await?;
        tracing::info!("Created default user {}", user.id);
    }

    Ok(())
}

/// In-memory pool for repository tests. Single connection, since every
/// `sqlite::memory:` connection is its own database.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    initialize_schema(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_user_seeded_once() {
        let pool = test_pool().await;

        ensure_default_user(&pool).await.unwrap();
        ensure_default_user(&pool).await.unwrap();

        let users = UserRepository::new(&pool).list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Default User");
    }
}
