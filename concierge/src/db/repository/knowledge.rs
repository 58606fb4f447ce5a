use chrono::Utc;
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{ChunkMetadata, KnowledgeChunk, RetrievedChunk};

pub struct KnowledgeRepository;

impl KnowledgeRepository {
    pub async fn create(conn: &Connection, chunk: &KnowledgeChunk) -> Result<()> {
        let metadata_json = serde_json::to_string(&chunk.metadata)?;
        let embedding_json = serde_json::to_string(&chunk.embedding)?;

        conn.execute(
            r#"
            INSERT INTO knowledge_chunks (
                id, text, metadata, chunk_index, total_chunks, embedding, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, vector32(?6), ?7)
            "#,
            params![
                chunk.id.clone(),
                chunk.text.clone(),
                metadata_json,
                chunk.metadata.chunk_index as i64,
                chunk.metadata.total_chunks as i64,
                embedding_json,
                Utc::now().to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn create_batch(conn: &Connection, chunks: &[KnowledgeChunk]) -> Result<()> {
        for chunk in chunks {
            Self::create(conn, chunk).await?;
        }
        Ok(())
    }

    pub async fn delete_all(conn: &Connection) -> Result<u64> {
        let affected = conn.execute("DELETE FROM knowledge_chunks", ()).await?;
        Ok(affected)
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn
            .query("SELECT COUNT(*) FROM knowledge_chunks", ())
            .await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)?.max(0) as u64),
            None => Ok(0),
        }
    }

    pub async fn search_similar(
        conn: &Connection,
        embedding: &[f32],
        limit: u32,
    ) -> Result<Vec<RetrievedChunk>> {
        let embedding_json = serde_json::to_string(embedding)?;

        let mut rows = conn
            .query(
                r#"
                SELECT
                    id,
                    text,
                    metadata,
                    1 - vector_distance_cos(embedding, vector32(?1)) AS score
                FROM knowledge_chunks
                WHERE embedding IS NOT NULL
                ORDER BY score DESC
                LIMIT ?2
                "#,
                params![embedding_json, limit],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            let metadata: ChunkMetadata = serde_json::from_str(&row.get::<String>(2)?)?;
            results.push(RetrievedChunk {
                id: row.get(0)?,
                text: row.get(1)?,
                metadata,
                score: row.get::<f64>(3)? as f32,
            });
        }

        Ok(results)
    }
}
