use libsql::Connection;

use crate::error::Result;

/// Create every table and index. `embedding_dimensions` only applies when the
/// knowledge table does not exist yet.
pub async fn init_schema(conn: &Connection, embedding_dimensions: usize) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Operational records, stored as opaque JSON
        CREATE TABLE IF NOT EXISTS rooms (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS catalog (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reservations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reservation_id TEXT UNIQUE,
            data TEXT NOT NULL
        );

        -- Metadata key-value store
        CREATE TABLE IF NOT EXISTS concierge_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .await?;

    create_knowledge_table(conn, embedding_dimensions).await?;

    Ok(())
}

pub async fn create_knowledge_table(conn: &Connection, embedding_dimensions: usize) -> Result<()> {
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS knowledge_chunks (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            metadata TEXT NOT NULL DEFAULT '{{}}',
            chunk_index INTEGER NOT NULL,
            total_chunks INTEGER NOT NULL,
            embedding F32_BLOB({embedding_dimensions}),
            created_at TEXT NOT NULL
        );
        "#
    ))
    .await?;

    create_vector_index(conn).await
}

/// Drop the knowledge table and recreate it with a new embedding width.
pub async fn rebuild_knowledge_table(conn: &Connection, embedding_dimensions: usize) -> Result<()> {
    tracing::info!(
        dimensions = embedding_dimensions,
        "Rebuilding knowledge table"
    );
    conn.execute_batch(
        r#"
        DROP INDEX IF EXISTS knowledge_chunks_embedding_idx;
        DROP TABLE IF EXISTS knowledge_chunks;
        "#,
    )
    .await?;

    create_knowledge_table(conn, embedding_dimensions).await
}

async fn create_vector_index(conn: &Connection) -> Result<()> {
    let index_exists: bool = conn
        .query(
            "SELECT 1 FROM sqlite_master WHERE type='index' AND name='knowledge_chunks_embedding_idx'",
            (),
        )
        .await?
        .next()
        .await?
        .is_some();

    if !index_exists {
        if let Err(e) = conn
            .execute(
                "CREATE INDEX IF NOT EXISTS knowledge_chunks_embedding_idx ON knowledge_chunks(libsql_vector_idx(embedding))",
                (),
            )
            .await
        {
            tracing::warn!("Vector index creation failed for knowledge_chunks (may already exist): {e}");
        }
    }

    Ok(())
}
