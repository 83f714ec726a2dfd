//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL)
        .execute(pool)
        .await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Users table (reader profiles and UI context)
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT NOT NULL DEFAULT '#3b82f6',
    theme TEXT NOT NULL DEFAULT 'default',
    ui_language TEXT NOT NULL DEFAULT 'it',
    mode TEXT NOT NULL DEFAULT 'light',
    -- Opaque UI state blob (JSON), persisted as-is for the client
    ui_state TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Annotations table (context fingerprint plus the note text)
CREATE TABLE IF NOT EXISTS annotations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    doc_id TEXT NOT NULL,
    -- The selected text, verbatim from the rendered body
    selection_text TEXT NOT NULL,
    -- Nearest structural anchor id at capture time (advisory)
    location_id TEXT,
    -- Byte offset of the selection at capture time (advisory)
    selection_offset INTEGER NOT NULL DEFAULT 0,
    -- Surrounding plain-text context for re-anchoring
    prefix TEXT NOT NULL DEFAULT '',
    suffix TEXT NOT NULL DEFAULT '',
    comment TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_annotations_user_doc ON annotations(user_id, doc_id);
CREATE INDEX IF NOT EXISTS idx_annotations_doc_id ON annotations(doc_id);

-- Bookmarks table (one per user and document)
CREATE TABLE IF NOT EXISTS bookmarks (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    doc_id TEXT NOT NULL,
    title TEXT NOT NULL,
    -- Document version date, empty for the current consolidation
    date TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT 'General',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),

    UNIQUE(user_id, doc_id)
);

CREATE INDEX IF NOT EXISTS idx_bookmarks_user_id ON bookmarks(user_id);
"#;
